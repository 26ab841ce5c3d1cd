// components/response_handler/src/action.rs
use crate::deadline::DeadlineFile;
use crate::decision::Decision;
use crate::handler::ResponseHandler;
use action_processor::{Action, ActionId, CompletionCode, OutputPipe};
use tracing::{info, warn};
use update_types::{InstallPlan, OmahaResponse};

/// Pipeline stage wrapping [`ResponseHandler`]
///
/// On success the plan goes downstream and the response deadline is handed
/// to the UI. Any other decision completes the stage with its code and
/// produces nothing.
pub struct ResponseHandlerAction {
    handler: ResponseHandler,
    deadline_file: DeadlineFile,
    got_no_update_response: bool,
}

impl ResponseHandlerAction {
    pub fn new(handler: ResponseHandler) -> Self {
        Self {
            handler,
            deadline_file: DeadlineFile::default(),
            got_no_update_response: false,
        }
    }

    pub fn with_deadline_file(mut self, deadline_file: DeadlineFile) -> Self {
        self.deadline_file = deadline_file;
        self
    }

    /// The last activation saw a response without an update
    pub fn got_no_update_response(&self) -> bool {
        self.got_no_update_response
    }
}

impl Action<OmahaResponse, InstallPlan> for ResponseHandlerAction {
    fn id(&self) -> ActionId {
        ActionId::new("omaha-response-handler")
    }

    fn description(&self) -> String {
        "Turn the update check response into an install plan".to_string()
    }

    fn perform(
        &mut self,
        response: &OmahaResponse,
        output: &mut OutputPipe<InstallPlan>,
    ) -> CompletionCode {
        let decision = self.handler.decide(response);
        self.got_no_update_response = decision == Decision::NoUpdate;

        let code = decision.completion_code();
        let plan = match decision {
            Decision::Success(plan) => plan,
            _ => return code,
        };

        info!("Using this install plan:\n{}", plan);
        if !output.produce(plan) {
            info!("No stage consumes the install plan");
        }

        if let Err(e) = self.deadline_file.write(&response.deadline) {
            warn!("Unable to write deadline file: {}", e);
        }

        code
    }
}
