//! # Billing Flow Choreography
//!
//! Drives the engine through whole-month scenarios: generation on the
//! 1st, escalation through the tier windows, payments closing shares
//! out, and the manual refresh variant's validation window.

#[cfg(test)]
mod tests {
    use crate::integration::{harness, member};
    use chrono::NaiveDate;
    use socios_billing::test_utils::{member_named, utc, RecordingNotifier};
    use socios_billing::{
        BillingApi, BillingError, ConfigStore, Period, Share, ShareDraft, ShareState,
    };
    use socios_types::{MemberId, Money, PaymentMethod};
    use std::collections::HashMap;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Amounts and states keyed by member for assertion convenience.
    async fn by_member(
        repository: &socios_billing::adapters::InMemoryShareRepository,
    ) -> HashMap<MemberId, (Money, ShareState)> {
        repository
            .all()
            .await
            .into_iter()
            .map(|s| (s.member_id, (s.amount, s.state)))
            .collect()
    }

    fn july() -> Period {
        Period::containing(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
    }

    fn june() -> Period {
        Period::containing(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
    }

    // =============================================================================
    // END-TO-END SCENARIO
    // =============================================================================

    /// Base 30000, three active members (one sibling-discounted):
    /// generation on July 1st yields {30000, 30000, 27000} Pending, and
    /// re-pricing on the 15th escalates to {33000, 33000, 29700} Overdue.
    #[tokio::test]
    async fn test_generation_then_repricing_end_to_end() {
        let ana = member_named("Ana Ríos", false);
        let zoe = member_named("Zoe Paz", false);
        let bruno = member_named("Bruno Gil", true);
        let (ana_id, zoe_id, bruno_id) = (ana.id, zoe.id, bruno.id);

        let h = harness(
            30_000,
            vec![ana, zoe, bruno],
            RecordingNotifier::new(),
            utc(2025, 7, 1, 12, 0),
        )
        .await;

        let report = h.service.generate_monthly_shares().await.unwrap();
        assert_eq!(report.period, july());
        assert_eq!(report.created, 3);
        assert_eq!(report.notified, 3);

        let shares = by_member(&h.repository).await;
        assert_eq!(shares[&ana_id], (Money::new(30_000), ShareState::Pending));
        assert_eq!(shares[&zoe_id], (Money::new(30_000), ShareState::Pending));
        assert_eq!(shares[&bruno_id], (Money::new(27_000), ShareState::Pending));

        h.clock.set(utc(2025, 7, 15, 12, 0));
        let report = h.service.reprice_outstanding().await.unwrap();
        assert_eq!(report.day_of_month, 15);
        assert_eq!(report.examined, 3);
        assert_eq!(report.repriced, 3);

        let shares = by_member(&h.repository).await;
        assert_eq!(shares[&ana_id], (Money::new(33_000), ShareState::Overdue));
        assert_eq!(shares[&zoe_id], (Money::new(33_000), ShareState::Overdue));
        assert_eq!(shares[&bruno_id], (Money::new(29_700), ShareState::Overdue));
    }

    // =============================================================================
    // IDEMPOTENCY
    // =============================================================================

    /// A second generation run for the same period creates nothing and
    /// sends nothing; a member activated in between is topped up without
    /// touching existing shares.
    #[tokio::test]
    async fn test_generation_idempotent_and_tops_up_roster_additions() {
        let h = harness(
            30_000,
            vec![member_named("Ana Ríos", false), member_named("Zoe Paz", false)],
            RecordingNotifier::new(),
            utc(2025, 7, 1, 12, 0),
        )
        .await;

        let first = h.service.generate_monthly_shares().await.unwrap();
        assert_eq!(first.created, 2);
        assert_eq!(h.notifier.sent_count(), 2);

        let second = h.service.generate_monthly_shares().await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.already_covered, 2);
        assert_eq!(h.repository.all().await.len(), 2);
        // No re-notification for already-covered members.
        assert_eq!(h.notifier.sent_count(), 2);

        // Mid-month activation: only the newcomer gets a share.
        let newcomer = member_named("Caro Luna", false);
        let newcomer_id = newcomer.id;
        h.directory.upsert(newcomer).await;

        let third = h.service.generate_monthly_shares().await.unwrap();
        assert_eq!(third.created, 1);
        assert_eq!(third.already_covered, 2);
        let shares = by_member(&h.repository).await;
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[&newcomer_id], (Money::new(30_000), ShareState::Pending));
    }

    // =============================================================================
    // PAID SHARES
    // =============================================================================

    /// Paid shares are excluded from re-pricing by the query itself,
    /// however stale their amount is.
    #[tokio::test]
    async fn test_paid_shares_are_never_repriced() {
        let ana = member_named("Ana Ríos", false);
        let zoe = member_named("Zoe Paz", false);
        let ana_id = ana.id;

        let h = harness(
            30_000,
            vec![ana, zoe],
            RecordingNotifier::new(),
            utc(2025, 7, 1, 12, 0),
        )
        .await;
        h.service.generate_monthly_shares().await.unwrap();

        // Ana pays within the first tier.
        let mut paid = h
            .repository
            .all()
            .await
            .into_iter()
            .find(|s| s.member_id == ana_id)
            .unwrap();
        paid.record_payment(
            PaymentMethod::Transfer,
            NaiveDate::from_ymd_opt(2025, 7, 8).unwrap(),
            None,
        )
        .unwrap();
        let paid_id = paid.id;
        h.repository.seed(paid).await;

        h.clock.set(utc(2025, 7, 25, 12, 0));
        let report = h.service.reprice_outstanding().await.unwrap();
        assert_eq!(report.examined, 1);
        assert_eq!(report.repriced, 1);

        let ana_share = h.repository.get(paid_id).await.unwrap();
        assert_eq!(ana_share.state, ShareState::Paid);
        assert_eq!(ana_share.amount, Money::new(30_000));
        assert_eq!(ana_share.payment_method, Some(PaymentMethod::Transfer));
    }

    // =============================================================================
    // ESCALATION
    // =============================================================================

    /// Observed across the whole month, an unpaid share's amount never
    /// decreases.
    #[tokio::test]
    async fn test_escalation_is_monotonic_within_the_period() {
        let bruno = member_named("Bruno Gil", true);
        let bruno_id = bruno.id;
        let h = harness(
            30_000,
            vec![bruno],
            RecordingNotifier::new(),
            utc(2025, 7, 1, 12, 0),
        )
        .await;
        h.service.generate_monthly_shares().await.unwrap();

        let mut last = Money::ZERO;
        for day in [1u32, 5, 10, 11, 15, 20, 21, 25, 31] {
            h.clock.set(utc(2025, 7, day, 12, 0));
            h.service.reprice_outstanding().await.unwrap();
            let amount = by_member(&h.repository).await[&bruno_id].0;
            assert!(
                amount >= last,
                "amount decreased on day {day}: {last} -> {amount}"
            );
            last = amount;
        }
        assert_eq!(last, Money::new(32_400)); // 27000 × 1.20
    }

    // =============================================================================
    // MANUAL REFRESH WINDOW
    // =============================================================================

    /// Day 11 is rejected with zero writes; day 5 succeeds and touches
    /// only shares whose period is the current month.
    #[tokio::test]
    async fn test_manual_refresh_window_and_scope() {
        let ana = member_named("Ana Ríos", false);
        let ana_id = ana.id;
        let h = harness(
            30_000,
            vec![ana],
            RecordingNotifier::new(),
            utc(2025, 7, 1, 12, 0),
        )
        .await;
        h.service.generate_monthly_shares().await.unwrap();

        // An overdue leftover from June.
        let leftover = Share {
            state: ShareState::Overdue,
            amount: Money::new(33_000),
            ..Share::from_draft(ShareDraft {
                member_id: ana_id,
                period: june(),
                amount: Money::new(33_000),
            })
        };
        let leftover_id = leftover.id;
        h.repository.seed(leftover).await;

        // The admin raises the base fee mid-window.
        h.config_store
            .set(socios_billing::CONFIG_KEY_BASE_AMOUNT, "32000")
            .await
            .unwrap();

        h.clock.set(utc(2025, 7, 5, 12, 0));
        let report = h.service.refresh_current_month().await.unwrap();
        assert_eq!(report.day_of_month, 5);
        assert_eq!(report.examined, 1);
        assert_eq!(report.repriced, 1);

        // Current-month share re-priced from the new base...
        let shares = by_member(&h.repository).await;
        assert_eq!(shares[&ana_id], (Money::new(32_000), ShareState::Pending));
        // ...while the June leftover is out of scope and untouched.
        let leftover = h.repository.get(leftover_id).await.unwrap();
        assert_eq!(leftover.amount, Money::new(33_000));
        assert_eq!(leftover.state, ShareState::Overdue);

        // Past day 10 the variant is rejected before doing anything.
        h.clock.set(utc(2025, 7, 11, 12, 0));
        let err = h.service.refresh_current_month().await.unwrap_err();
        assert!(matches!(err, BillingError::RefreshWindowClosed { day: 11 }));
        let shares = by_member(&h.repository).await;
        assert_eq!(shares[&ana_id], (Money::new(32_000), ShareState::Pending));
    }

    /// The scheduled (non-manual) job applies today's day-of-month to
    /// prior-month shares too; they are not frozen at their own month's
    /// escalation.
    #[tokio::test]
    async fn test_daily_repricing_spans_prior_months() {
        let ana = member_named("Ana Ríos", false);
        let ana_id = ana.id;
        let h = harness(
            30_000,
            vec![ana],
            RecordingNotifier::new(),
            utc(2025, 7, 5, 12, 0),
        )
        .await;

        let leftover = Share {
            state: ShareState::Overdue,
            amount: Money::new(33_000),
            ..Share::from_draft(ShareDraft {
                member_id: ana_id,
                period: june(),
                amount: Money::new(33_000),
            })
        };
        let leftover_id = leftover.id;
        h.repository.seed(leftover).await;

        let report = h.service.reprice_outstanding().await.unwrap();
        assert_eq!(report.examined, 1);
        assert_eq!(report.repriced, 1);

        // June's share is re-priced by July's day 5: back to the base
        // amount and Pending.
        let leftover = h.repository.get(leftover_id).await.unwrap();
        assert_eq!(leftover.amount, Money::new(30_000));
        assert_eq!(leftover.state, ShareState::Pending);
        assert_eq!(leftover.period, june());
    }

    // =============================================================================
    // NOTIFICATION FAN-OUT
    // =============================================================================

    /// One bounced mailbox neither aborts the batch nor rolls back any
    /// created share; members without an address are skipped silently.
    #[tokio::test]
    async fn test_notifier_failure_is_isolated_per_member() {
        let ana = member_named("Ana Ríos", false);
        let zoe = member_named("Zoe Paz", false);
        let zoe_email = zoe.email.clone().unwrap();
        let carla = member("Carla Sol", false, None);

        let h = harness(
            30_000,
            vec![ana, zoe, carla],
            RecordingNotifier::new().with_failure_for(&zoe_email),
            utc(2025, 7, 1, 12, 0),
        )
        .await;

        let report = h.service.generate_monthly_shares().await.unwrap();
        assert_eq!(report.created, 3);
        assert_eq!(report.notified, 1);
        assert_eq!(report.notification_failures, 1);
        assert_eq!(report.skipped_no_address, 1);
        assert_eq!(report.notification_summary(), "1 of 3 notified");

        // All three shares exist regardless of delivery outcome.
        assert_eq!(h.repository.all().await.len(), 3);
    }
}
