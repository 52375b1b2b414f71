use chrono::{Local, NaiveDate};
use tracing::{error, info, warn};

use crate::config::PontoConfig;
use crate::error::PontoError;
use crate::jira::{JiraClient, TransitionRef};
use crate::schedule::{Slot, SlotName};
use crate::waiter::{self, WaitResult};

/// Outcome of one attempt against one issue.
///
/// `NotFound` is represented by an empty [`SlotRun`]; auth and network
/// failures propagate as errors instead of outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The transition was executed; `final_status` is the status the tracker
    /// reported afterwards, when the confirmation fetch succeeded.
    Transitioned {
        key: String,
        final_status: Option<String>,
    },
    /// Test mode: the transition was located but deliberately not invoked.
    DryRun { key: String, transition_id: String },
    /// The workflow exposes no transition with the configured name. Terminal;
    /// a retry cannot fix a missing workflow transition.
    TransitionMissing {
        key: String,
        available: Vec<String>,
    },
}

/// Result of a full slot pass: one outcome per matching issue, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRun {
    pub slot_name: SlotName,
    pub outcomes: Vec<Outcome>,
}

impl SlotRun {
    /// True when nothing went wrong: every issue either transitioned, was a
    /// dry run, or nothing matched at all.
    pub fn is_clean(&self) -> bool {
        !self
            .outcomes
            .iter()
            .any(|o| matches!(o, Outcome::TransitionMissing { .. }))
    }
}

/// Build the JQL scoping the daily search: same assignee, the slot's source
/// status, and a plan-start-date custom field covering `today`.
///
/// This query is the sole guard against double-firing: an issue that already
/// left the source status simply stops matching.
pub fn build_jql(account_id: &str, from_status: &str, today: NaiveDate, field: u32) -> String {
    let day = today.format("%Y-%m-%d");
    format!(
        "assignee = \"{account_id}\" AND status = \"{from_status}\" \
         AND cf[{field}] >= \"{day} 00:00\" AND cf[{field}] <= \"{day} 23:59\""
    )
}

/// Match the configured label against the tracker-reported transitions,
/// case-insensitively. First match wins; display names are expected unique
/// up to case.
pub fn find_transition<'a>(
    transitions: &'a [TransitionRef],
    label: &str,
) -> Option<&'a TransitionRef> {
    let target = label.to_lowercase();
    transitions.iter().find(|t| t.name.to_lowercase() == target)
}

/// Drives one slot through the pipeline: wait → locate → transition → verify.
///
/// Holds no state across invocations; the tracker's status field is the only
/// synchronization point with other slot runs.
pub struct Engine<'a> {
    client: &'a JiraClient,
    plan_start_field: u32,
    /// Test mode: locate the transition but never invoke it.
    dry_run: bool,
}

impl<'a> Engine<'a> {
    pub fn new(client: &'a JiraClient, config: &PontoConfig, dry_run: bool) -> Self {
        Self {
            client,
            plan_start_field: config.plan_start_field,
            dry_run,
        }
    }

    /// Run the full pipeline for `slot`. When `wait` is set, blocks until the
    /// slot's exact trigger second before searching.
    pub async fn run_slot(&self, slot: &Slot, wait: bool) -> Result<SlotRun, PontoError> {
        info!(
            "=== Running slot {} ({}) ===",
            slot.name, slot.description
        );
        info!("Looking for issues with status: {}", slot.from_status);
        info!("Will apply transition: {}", slot.transition_name);

        let user = self.client.myself().await?;
        info!(
            "Authenticated as: {} (account {})",
            user.display_name, user.account_id
        );

        if wait && waiter::wait_until(slot.trigger_time).await == WaitResult::DateChanged {
            warn!("Slot {} abandoned: date rolled over during wait", slot.name);
            return Ok(SlotRun {
                slot_name: slot.name,
                outcomes: Vec::new(),
            });
        }

        let today = Local::now().date_naive();
        let jql = build_jql(
            &user.account_id,
            slot.from_status,
            today,
            self.plan_start_field,
        );
        info!("JQL: {jql}");

        let issues = self.client.search(&jql).await?;
        if issues.is_empty() {
            info!(
                "No issues found for status \"{}\" today. Nothing to transition.",
                slot.from_status
            );
            return Ok(SlotRun {
                slot_name: slot.name,
                outcomes: Vec::new(),
            });
        }
        info!(
            "Found {} issue(s): {:?}",
            issues.len(),
            issues.iter().map(|i| i.key.as_str()).collect::<Vec<_>>()
        );

        // Each matching issue is processed and logged independently; there is
        // no cross-item coordination.
        let mut outcomes = Vec::with_capacity(issues.len());
        for issue in &issues {
            let summary = issue.fields.summary.as_deref().unwrap_or("(no summary)");
            info!("Processing issue: {} - {}", issue.key, summary);
            outcomes.push(self.process_issue(&issue.key, slot).await?);
        }

        Ok(SlotRun {
            slot_name: slot.name,
            outcomes,
        })
    }

    async fn process_issue(&self, key: &str, slot: &Slot) -> Result<Outcome, PontoError> {
        let transitions = self.client.transitions(key).await?;
        let Some(transition) = find_transition(&transitions, slot.transition_name) else {
            let available: Vec<String> = transitions.iter().map(|t| t.name.clone()).collect();
            error!(
                "Transition \"{}\" not found for {key}. Available transitions: {available:?}",
                slot.transition_name
            );
            return Ok(Outcome::TransitionMissing {
                key: key.to_string(),
                available,
            });
        };

        if self.dry_run {
            info!(
                "TEST MODE: would execute transition \"{}\" (id={}) on {key}",
                transition.name, transition.id
            );
            return Ok(Outcome::DryRun {
                key: key.to_string(),
                transition_id: transition.id.clone(),
            });
        }

        info!(
            "Executing transition \"{}\" (id={}) on {key}",
            transition.name, transition.id
        );
        let before = Local::now();
        self.client.transition(key, &transition.id).await?;
        let after = Local::now();
        info!(
            "SUCCESS: {key} transitioned via \"{}\" | before={} | after={}",
            transition.name,
            before.format("%Y-%m-%d %H:%M:%S%.6f"),
            after.format("%Y-%m-%d %H:%M:%S%.6f"),
        );

        // The tracker is authoritative and may route through an intermediate
        // state; a mismatch here is a warning, never a failure, and a failed
        // fetch is not rolled back.
        let final_status = match self.client.current_status(key).await {
            Ok(status) => {
                match status.as_deref() {
                    Some(s) if s == slot.to_status => {
                        info!("{key} confirmed in status \"{s}\"")
                    }
                    Some(s) => warn!(
                        "{key} is in status \"{s}\", expected \"{}\"",
                        slot.to_status
                    ),
                    None => warn!("{key}: tracker reported no status after transition"),
                }
                status
            }
            Err(e) => {
                warn!("Could not confirm status of {key} after transition: {e}");
                None
            }
        };

        Ok(Outcome::Transitioned {
            key: key.to_string(),
            final_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transition_ref(id: &str, name: &str) -> TransitionRef {
        TransitionRef {
            id: id.into(),
            name: name.into(),
            to: None,
        }
    }

    #[test]
    fn jql_shape_matches_tracker_dialect() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
        let jql = build_jql("abc123", "SUPPORT OPEN", today, 10093);
        assert_eq!(
            jql,
            "assignee = \"abc123\" AND status = \"SUPPORT OPEN\" \
             AND cf[10093] >= \"2026-02-23 00:00\" AND cf[10093] <= \"2026-02-23 23:59\""
        );
    }

    #[test]
    fn transition_match_is_case_insensitive() {
        let transitions = vec![
            transition_ref("11", "Cancel"),
            transition_ref("21", "Hold Support"),
        ];
        assert_eq!(
            find_transition(&transitions, "Hold Support").map(|t| t.id.as_str()),
            Some("21")
        );
        assert_eq!(
            find_transition(&transitions, "HOLD SUPPORT").map(|t| t.id.as_str()),
            Some("21")
        );
        assert_eq!(
            find_transition(&transitions, "hold support").map(|t| t.id.as_str()),
            Some("21")
        );
        assert!(find_transition(&transitions, "Support Done").is_none());
    }

    #[test]
    fn transition_match_first_wins_on_case_variants() {
        let transitions = vec![
            transition_ref("1", "HOLD SUPPORT"),
            transition_ref("2", "Hold Support"),
        ];
        assert_eq!(
            find_transition(&transitions, "hold support").map(|t| t.id.as_str()),
            Some("1")
        );
    }

    // --- Scenario tests against a mock Jira ---

    async fn mock_myself(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/rest/api/3/myself"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"accountId": "abc123", "displayName": "Marlow Sousa"}"#,
                "application/json",
            ))
            .mount(server)
            .await;
    }

    fn engine_parts(server: &MockServer, dry_run: bool) -> (JiraClient, PontoConfig, bool) {
        let client = JiraClient::new(server.uri(), "me@example.com".into(), "tok".into());
        (client, PontoConfig::default(), dry_run)
    }

    #[tokio::test]
    async fn scenario_open_issue_transitions_at_8am() {
        let server = MockServer::start().await;
        mock_myself(&server).await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"issues": [{"key": "PRJ-1", "fields": {"summary": "Daily support", "status": {"name": "SUPPORT OPEN"}}}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/PRJ-1/transitions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"transitions": [{"id": "11", "name": "INPROGRESS SUPPORT"}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issue/PRJ-1/transitions"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/PRJ-1"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"key": "PRJ-1", "fields": {"status": {"name": "SUPPORT INPROGRESS"}}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let (client, config, dry_run) = engine_parts(&server, false);
        let engine = Engine::new(&client, &config, dry_run);
        let run = engine
            .run_slot(&schedule::slot(SlotName::MorningStart), false)
            .await
            .unwrap();

        assert!(run.is_clean());
        assert_eq!(
            run.outcomes,
            vec![Outcome::Transitioned {
                key: "PRJ-1".into(),
                final_status: Some("SUPPORT INPROGRESS".into()),
            }]
        );
    }

    #[tokio::test]
    async fn scenario_no_issue_at_1pm_is_a_clean_noop() {
        let server = MockServer::start().await;
        mock_myself(&server).await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"issues": []}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let (client, config, dry_run) = engine_parts(&server, false);
        let engine = Engine::new(&client, &config, dry_run);
        let run = engine
            .run_slot(&schedule::slot(SlotName::LunchResume), false)
            .await
            .unwrap();

        assert!(run.outcomes.is_empty());
        assert!(run.is_clean());
    }

    #[tokio::test]
    async fn scenario_missing_transition_is_reported_not_fatal() {
        let server = MockServer::start().await;
        mock_myself(&server).await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"issues": [{"key": "PRJ-1", "fields": {"status": {"name": "SUPPORT INPROGRESS"}}}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/PRJ-1/transitions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"transitions": [{"id": "41", "name": "Cancel"}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issue/PRJ-1/transitions"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let (client, config, dry_run) = engine_parts(&server, false);
        let engine = Engine::new(&client, &config, dry_run);
        let run = engine
            .run_slot(&schedule::slot(SlotName::EndOfDay), false)
            .await
            .unwrap();

        assert!(!run.is_clean());
        assert_eq!(
            run.outcomes,
            vec![Outcome::TransitionMissing {
                key: "PRJ-1".into(),
                available: vec!["Cancel".into()],
            }]
        );
    }

    #[tokio::test]
    async fn scenario_test_mode_leaves_tracker_untouched() {
        let server = MockServer::start().await;
        mock_myself(&server).await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"issues": [{"key": "PRJ-1", "fields": {"status": {"name": "SUPPORT INPROGRESS"}}}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/PRJ-1/transitions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"transitions": [{"id": "21", "name": "Hold Support"}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issue/PRJ-1/transitions"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let (client, config, dry_run) = engine_parts(&server, true);
        let engine = Engine::new(&client, &config, dry_run);
        let run = engine
            .run_slot(&schedule::slot(SlotName::LunchHold), false)
            .await
            .unwrap();

        assert_eq!(
            run.outcomes,
            vec![Outcome::DryRun {
                key: "PRJ-1".into(),
                transition_id: "21".into(),
            }]
        );
    }

    #[tokio::test]
    async fn duplicate_invocation_is_safe_once_committed() {
        // After the first transition commits, the issue no longer matches the
        // slot's source-status query; the second pass finds nothing.
        let server = MockServer::start().await;
        mock_myself(&server).await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"issues": []}"#, "application/json"),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issue/PRJ-1/transitions"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let (client, config, dry_run) = engine_parts(&server, false);
        let engine = Engine::new(&client, &config, dry_run);
        let run = engine
            .run_slot(&schedule::slot(SlotName::MorningStart), false)
            .await
            .unwrap();
        assert!(run.outcomes.is_empty());
    }

    #[tokio::test]
    async fn auth_failure_propagates_as_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/myself"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (client, config, dry_run) = engine_parts(&server, false);
        let engine = Engine::new(&client, &config, dry_run);
        let err = engine
            .run_slot(&schedule::slot(SlotName::MorningStart), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("status 401"));
    }
}
