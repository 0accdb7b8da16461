//! Full batch over the in-memory store and the shipped rule documents.

use rill_core::DeviceType;
use rill_insight::*;
use rill_query::DataService;

use crate::fixtures::*;

fn run() -> BatchReport {
    let rules = rules();
    let data = town();
    let ctx = ResolutionContext::new(ref_date(), &rules.thresholds, &data);
    let accounts = data.accounts();
    BatchRunner::new(Resolver::registry(&rules.insight)).run(&ctx, &accounts)
}

fn winner(report: &BatchReport, account: rill_core::AccountKey) -> Option<&AccountInsight> {
    report.winners.iter().find(|w| w.account == account)
}

#[test]
fn steady_household_gets_infinite_increase() {
    let report = run();
    let alice = winner(&report, alice()).expect("alice has a message");

    assert_eq!(alice.device_type, DeviceType::Meter);
    assert_eq!(alice.scored.score, f64::INFINITY);
    assert_eq!(
        alice.scored.template(),
        RecommendationTemplate::InsightA1DayOfWeekConsumptionIncr
    );

    let TemplateParameters::InsightA1(params) = &alice.scored.parameters;
    assert_eq!(params.current_value(), 90.0);
    assert_eq!(params.average_value(), 60.0);
    assert_eq!(params.percent_change(), 50);
}

#[test]
fn negligible_usage_today_is_ignored() {
    assert!(winner(&run(), bob()).is_none());
}

#[test]
fn short_history_is_ignored() {
    assert!(winner(&run(), carol()).is_none());
}

#[test]
fn varying_household_gets_finite_decrease() {
    let report = run();
    let dave = winner(&report, dave()).expect("dave has a message");

    // Mean 100, population sd 10: today's 80 is two deviations below.
    let expected = 2.0 / (2.0 * 1.28);
    assert!((dave.scored.score - expected).abs() < 1e-9);
    assert_eq!(
        dave.scored.template(),
        RecommendationTemplate::InsightA1DayOfWeekConsumptionDecr
    );
}

#[test]
fn batch_reports_no_failures() {
    let report = run();
    assert!(report.failures.is_empty());
    assert_eq!(report.winners.len(), 2);
}

#[test]
fn min_score_keeps_only_strong_messages() {
    let rules = rules();
    let data = town();
    let ctx = ResolutionContext::new(ref_date(), &rules.thresholds, &data);
    let report = BatchRunner::new(Resolver::registry(&rules.insight))
        .with_min_score(1.0)
        .run(&ctx, &data.accounts());

    assert_eq!(report.winners.len(), 1);
    assert_eq!(report.winners[0].account, alice());
}

#[test]
fn store_failure_is_isolated_per_account() {
    use rill_query::{DataQuery, DataQueryResponse, InMemoryDataService, QueryError};

    /// Fails every query for one account.
    struct Flaky {
        inner: InMemoryDataService,
        bad: rill_core::AccountKey,
    }

    impl DataService for Flaky {
        fn execute(&self, query: &DataQuery) -> Result<DataQueryResponse, QueryError> {
            if query.account().key == self.bad {
                return Err(QueryError::Unavailable("shard offline".to_string()));
            }
            self.inner.execute(query)
        }
    }

    let rules = rules();
    let data = Flaky {
        inner: town(),
        bad: dave(),
    };
    let ctx = ResolutionContext::new(ref_date(), &rules.thresholds, &data);
    let accounts = data.inner.accounts();
    let report = BatchRunner::new(Resolver::registry(&rules.insight)).run(&ctx, &accounts);

    assert!(winner(&report, alice()).is_some());
    assert!(winner(&report, dave()).is_none());
    assert!(report.failures.iter().all(|f| f.account == dave()));
    assert_eq!(report.failures.len(), DeviceType::ALL.len());
}

#[test]
fn report_json_keeps_infinite_scores() {
    let json = serde_json::to_value(run()).unwrap();
    let winners = json["winners"].as_array().unwrap();
    let score_of = |account: rill_core::AccountKey| {
        winners
            .iter()
            .find(|w| w["account"] == account.to_string())
            .map(|w| w["scored"]["score"].clone())
            .unwrap()
    };

    assert_eq!(score_of(alice()), "inf");
    assert!(score_of(dave()).is_f64());
}
