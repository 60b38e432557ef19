use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use super::*;
use crate::generation::request::{StatusResponse, SubmitResponse};
use crate::generation::settings::GenerationSettings;

#[derive(Default)]
struct ScriptedApi {
    submit_error: Option<String>,
    statuses: RefCell<VecDeque<InpaintResult<StatusResponse>>>,
    /// Returned once the script runs dry.
    fallback: Option<&'static str>,
    polls: Cell<u32>,
}

impl ScriptedApi {
    fn with(statuses: Vec<InpaintResult<StatusResponse>>) -> Self {
        Self {
            statuses: RefCell::new(statuses.into()),
            ..Self::default()
        }
    }

    fn pending_forever() -> Self {
        Self {
            fallback: Some(r#"{"status": "Pending"}"#),
            ..Self::default()
        }
    }
}

impl InpaintApi for ScriptedApi {
    fn submit(&self, _request: &InpaintRequest) -> InpaintResult<SubmitResponse> {
        match &self.submit_error {
            Some(msg) => Err(InpaintError::network(msg.clone())),
            None => Ok(SubmitResponse {
                id: "job-1".to_string(),
                polling_url: None,
            }),
        }
    }

    fn poll(&self, id: &str) -> InpaintResult<StatusResponse> {
        assert_eq!(id, "job-1");
        self.polls.set(self.polls.get() + 1);
        if let Some(next) = self.statuses.borrow_mut().pop_front() {
            return next;
        }
        let body = self.fallback.expect("status script exhausted");
        Ok(serde_json::from_str(body).unwrap())
    }

    fn download(&self, _url: &str) -> InpaintResult<Vec<u8>> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct CountingDelay {
    total: Duration,
    calls: u32,
}

impl Delay for CountingDelay {
    fn sleep(&mut self, dur: Duration) {
        self.total += dur;
        self.calls += 1;
    }
}

fn status(json: &str) -> InpaintResult<StatusResponse> {
    Ok(serde_json::from_str(json).unwrap())
}

fn request() -> InpaintRequest {
    InpaintRequest::new("AAAA", "BBBB", &GenerationSettings::default().with_prompt("x"))
}

#[test]
fn ready_after_pending() {
    let api = ScriptedApi::with(vec![
        status(r#"{"status": "Pending"}"#),
        status(r#"{"status": "Ready", "result": {"sample": "https://cdn/x.jpg", "seed": 9}}"#),
    ]);
    let mut delay = CountingDelay::default();
    let mut sub = Submitter::new(&api, &mut delay, PollOpts::default());

    let mut seen = Vec::new();
    let result = sub
        .generate_with_progress(&request(), |s| seen.push(s.clone()))
        .unwrap();
    assert_eq!(result.sample, "https://cdn/x.jpg");
    assert_eq!(result.seed, Some(9));
    assert!(sub.state().is_terminal());
    assert!(!sub.is_generating());
    drop(sub);

    assert_eq!(api.polls.get(), 2);
    assert_eq!(delay.calls, 1);
    assert_eq!(delay.total, Duration::from_secs(5));
    assert_eq!(seen[0], GenerationState::Submitting);
    assert_eq!(
        seen[1],
        GenerationState::Polling {
            id: "job-1".to_string(),
            attempt: 1
        }
    );
    assert!(matches!(seen.last(), Some(GenerationState::Ready(_))));
}

#[test]
fn times_out_after_max_attempts() {
    let api = ScriptedApi::pending_forever();
    let mut delay = CountingDelay::default();
    let mut sub = Submitter::new(&api, &mut delay, PollOpts::default());

    let err = sub.generate(&request()).unwrap_err();
    assert!(matches!(err, InpaintError::Timeout { attempts: 60 }));
    assert_eq!(
        sub.state(),
        &GenerationState::TimedOut {
            id: "job-1".to_string(),
            attempts: 60
        }
    );
    drop(sub);
    assert_eq!(api.polls.get(), 60);
    assert_eq!(delay.calls, 59);
}

#[test]
fn remote_failure_message_is_verbatim() {
    let api = ScriptedApi::with(vec![status(
        r#"{"status": "Failed", "error": "NSFW content detected"}"#,
    )]);
    let mut delay = CountingDelay::default();
    let mut sub = Submitter::new(&api, &mut delay, PollOpts::default());

    let err = sub.generate(&request()).unwrap_err();
    assert_eq!(err.user_message(), "NSFW content detected");
    assert_eq!(
        sub.state(),
        &GenerationState::Failed("NSFW content detected".to_string())
    );
}

#[test]
fn failure_without_message_uses_default() {
    let api = ScriptedApi::with(vec![status(r#"{"status": "failed"}"#)]);
    let mut delay = CountingDelay::default();
    let mut sub = Submitter::new(&api, &mut delay, PollOpts::default());
    let err = sub.generate(&request()).unwrap_err();
    assert!(matches!(err, InpaintError::GenerationFailed(ref m) if m == "Generation failed"));
}

#[test]
fn unknown_status_halts_polling() {
    let api = ScriptedApi::with(vec![
        status(r#"{"status": "Pending"}"#),
        status(r#"{"status": "Content Moderated"}"#),
        status(r#"{"status": "Pending"}"#),
    ]);
    let mut delay = CountingDelay::default();
    let mut sub = Submitter::new(&api, &mut delay, PollOpts::default());

    let err = sub.generate(&request()).unwrap_err();
    assert!(matches!(err, InpaintError::UnknownStatus(ref s) if s == "Content Moderated"));
    drop(sub);
    assert_eq!(api.polls.get(), 2);
}

#[test]
fn poll_error_is_not_retried() {
    let api = ScriptedApi::with(vec![Err(InpaintError::network("FLUX polling error: 502"))]);
    let mut delay = CountingDelay::default();
    let mut sub = Submitter::new(&api, &mut delay, PollOpts::default());

    let err = sub.generate(&request()).unwrap_err();
    assert_eq!(err.user_message(), "Failed to check generation status");
    drop(sub);
    assert_eq!(api.polls.get(), 1);
}

#[test]
fn submit_error_skips_polling() {
    let api = ScriptedApi {
        submit_error: Some("FLUX API error: 401".to_string()),
        ..ScriptedApi::default()
    };
    let mut delay = CountingDelay::default();
    let mut sub = Submitter::new(&api, &mut delay, PollOpts::default());

    let err = sub.generate(&request()).unwrap_err();
    assert!(matches!(err, InpaintError::Network(_)));
    assert_eq!(
        sub.state(),
        &GenerationState::Failed("FLUX API error: 401".to_string())
    );
    drop(sub);
    assert_eq!(api.polls.get(), 0);
}
