use crate::config::PollOpts;
use crate::foundation::error::{InpaintError, InpaintResult};
use crate::generation::api::{Delay, InpaintApi};
use crate::generation::request::{GenerationResult, InpaintRequest, JobStatus};

const DEFAULT_FAILURE: &str = "Generation failed";
const POLL_FAILURE: &str = "Failed to check generation status";

/// Lifecycle of one generation.
#[derive(Clone, Debug, PartialEq)]
pub enum GenerationState {
    Idle,
    Submitting,
    Polling { id: String, attempt: u32 },
    Ready(GenerationResult),
    Failed(String),
    TimedOut { id: String, attempts: u32 },
}

impl GenerationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Ready(_) | Self::Failed(_) | Self::TimedOut { .. }
        )
    }
}

/// Drives submit-then-poll against an [`InpaintApi`].
///
/// Polling is a plain blocking loop; hosts that need a responsive UI run
/// [`Submitter::generate`] on a worker thread. The first status check happens
/// right after the job id arrives and every later one after `poll.interval()`.
/// Nothing is retried: every failure ends the run.
#[derive(Debug)]
pub struct Submitter<A, D> {
    api: A,
    delay: D,
    poll: PollOpts,
    state: GenerationState,
}

impl<A: InpaintApi, D: Delay> Submitter<A, D> {
    pub fn new(api: A, delay: D, poll: PollOpts) -> Self {
        Self {
            api,
            delay,
            poll,
            state: GenerationState::Idle,
        }
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn is_generating(&self) -> bool {
        matches!(
            self.state,
            GenerationState::Submitting | GenerationState::Polling { .. }
        )
    }

    pub fn generate(&mut self, request: &InpaintRequest) -> InpaintResult<GenerationResult> {
        self.generate_with_progress(request, |_| {})
    }

    /// Run one generation, reporting every state transition to `on_state`.
    #[tracing::instrument(skip_all, fields(finetune = request.uses_finetune()))]
    pub fn generate_with_progress(
        &mut self,
        request: &InpaintRequest,
        mut on_state: impl FnMut(&GenerationState),
    ) -> InpaintResult<GenerationResult> {
        if self.is_generating() {
            return Err(InpaintError::validation("a generation is already running"));
        }

        self.transition(GenerationState::Submitting, &mut on_state);
        let id = match self.api.submit(request) {
            Ok(resp) => resp.id,
            Err(err) => {
                tracing::error!(error = %err, "submission failed");
                self.transition(GenerationState::Failed(err.user_message()), &mut on_state);
                return Err(err);
            }
        };
        tracing::info!(%id, "job submitted");

        let max = self.poll.max_attempts;
        for attempt in 1..=max {
            if attempt > 1 {
                self.delay.sleep(self.poll.interval());
            }
            self.transition(
                GenerationState::Polling {
                    id: id.clone(),
                    attempt,
                },
                &mut on_state,
            );

            let status = match self.api.poll(&id) {
                Ok(resp) => resp.job_status(),
                Err(err) => {
                    tracing::error!(%id, attempt, error = %err, "status check failed");
                    self.transition(
                        GenerationState::Failed(POLL_FAILURE.to_string()),
                        &mut on_state,
                    );
                    return Err(InpaintError::network(POLL_FAILURE));
                }
            };

            match status {
                JobStatus::Pending => {
                    tracing::debug!(%id, attempt, max, "job pending");
                }
                JobStatus::Ready(result) => {
                    tracing::info!(
                        %id,
                        attempt,
                        sample = %result.sample,
                        seed = ?result.seed,
                        "generation ready"
                    );
                    self.transition(GenerationState::Ready(result.clone()), &mut on_state);
                    return Ok(result);
                }
                JobStatus::Failed(error) => {
                    let msg = error.unwrap_or_else(|| DEFAULT_FAILURE.to_string());
                    tracing::error!(%id, attempt, error = %msg, "generation failed");
                    self.transition(GenerationState::Failed(msg.clone()), &mut on_state);
                    return Err(InpaintError::generation_failed(msg));
                }
                JobStatus::Unknown(status) => {
                    tracing::warn!(%id, attempt, %status, "unknown job status, polling stopped");
                    let err = InpaintError::unknown_status(status);
                    self.transition(GenerationState::Failed(err.user_message()), &mut on_state);
                    return Err(err);
                }
            }
        }

        tracing::error!(%id, attempts = max, "generation timed out");
        self.transition(
            GenerationState::TimedOut {
                id,
                attempts: max,
            },
            &mut on_state,
        );
        Err(InpaintError::Timeout { attempts: max })
    }

    fn transition(&mut self, next: GenerationState, on_state: &mut impl FnMut(&GenerationState)) {
        self.state = next;
        on_state(&self.state);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generation/submitter.rs"]
mod tests;
