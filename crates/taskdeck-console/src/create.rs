/*
[INPUT]:  Operator-entered task fields and CreateTask replies
[OUTPUT]: Validated create requests, submission phases, and the created Task
[POS]:    Task create workflow - single-shot submit with local validation
[UPDATE]: When the create form gains fields or validation rules
*/

use serde_json::Value;
use taskdeck_adapter::{
    CreateTaskRequest, CreateTaskResponse, Payload, TASK_TYPE_RUN_QUERY, Task, TaskStatus,
};

use crate::error::ConsoleError;

/// Raw form input, kept verbatim across failed submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateForm {
    pub name: String,
    pub description: String,
    pub task_type: String,
    pub parameters_text: String,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            task_type: TASK_TYPE_RUN_QUERY.to_string(),
            parameters_text: String::from("{}"),
        }
    }
}

impl CreateForm {
    pub fn validate(&self) -> Result<TaskSpec, ConsoleError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ConsoleError::Validation("name is required".to_string()));
        }
        let task_type = self.task_type.trim();
        if task_type.is_empty() {
            return Err(ConsoleError::Validation("type is required".to_string()));
        }
        let parameters: Value = serde_json::from_str(&self.parameters_text).map_err(|err| {
            ConsoleError::Validation(format!("parameters must be valid JSON: {err}"))
        })?;

        Ok(TaskSpec {
            name: name.to_string(),
            task_type: task_type.to_string(),
            description: self.description.clone(),
            parameters,
        })
    }
}

/// A task specification that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    pub name: String,
    pub task_type: String,
    pub description: String,
    pub parameters: Value,
}

impl TaskSpec {
    pub fn to_request(&self) -> CreateTaskRequest {
        CreateTaskRequest::new(
            self.name.clone(),
            self.task_type.clone(),
            self.description.clone(),
            self.parameters.clone(),
        )
    }

    /// The service only echoes the id, so the rest comes from the submission.
    pub fn into_task(self, id: i64) -> Task {
        Task {
            id,
            name: self.name,
            task_type: self.task_type,
            description: self.description,
            payload: Payload {
                parameters: self.parameters,
            },
            status: TaskStatus::Queued.code(),
            retries: 0,
        }
    }
}

/// Reject replies without a usable server-assigned id.
pub fn created_id(response: &CreateTaskResponse) -> Result<i64, ConsoleError> {
    match response.id {
        Some(id) if id != 0 => Ok(id),
        _ => Err(ConsoleError::MalformedResponse(
            "created task has no id".to_string(),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatePhase {
    Idle,
    Submitting,
    Succeeded(i64),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CreateWorkflow {
    form: CreateForm,
    phase: CreatePhase,
    open: bool,
    pending: Option<TaskSpec>,
    last_error: Option<String>,
}

impl Default for CreateWorkflow {
    fn default() -> Self {
        Self {
            form: CreateForm::default(),
            phase: CreatePhase::Idle,
            open: false,
            pending: None,
            last_error: None,
        }
    }
}

impl CreateWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Closing keeps the entered fields for the next open.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn form(&self) -> &CreateForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CreateForm {
        &mut self.form
    }

    pub fn phase(&self) -> &CreatePhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == CreatePhase::Submitting
    }

    /// Message of the last rejected submission, cleared on the next attempt
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validate and enter `Submitting`.
    ///
    /// Returns `Ok(None)` while a submission is already in flight.
    pub fn begin_submit(&mut self) -> Result<Option<CreateTaskRequest>, ConsoleError> {
        if self.is_submitting() {
            return Ok(None);
        }
        self.last_error = None;
        match self.form.validate() {
            Ok(spec) => {
                let request = spec.to_request();
                self.pending = Some(spec);
                self.phase = CreatePhase::Submitting;
                Ok(Some(request))
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Settle the in-flight submission with the service reply.
    pub fn complete(
        &mut self,
        result: Result<CreateTaskResponse, ConsoleError>,
    ) -> Result<Task, ConsoleError> {
        let Some(spec) = self.pending.take() else {
            return Err(ConsoleError::MalformedResponse(
                "no create request in flight".to_string(),
            ));
        };

        match result.and_then(|response| created_id(&response)) {
            Ok(id) => {
                self.phase = CreatePhase::Succeeded(id);
                self.form = CreateForm::default();
                self.open = false;
                Ok(spec.into_task(id))
            }
            Err(err) => {
                let message = err.to_string();
                self.phase = CreatePhase::Failed(message.clone());
                self.last_error = Some(message);
                Err(err)
            }
        }
    }

    /// Drop an in-flight submission whose reply will never arrive.
    ///
    /// The entered form is kept so the operator can submit it again.
    pub fn abandon(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("abandoning in-flight create request");
        }
        if self.is_submitting() {
            self.phase = CreatePhase::Idle;
        }
    }

    /// Return to `Idle` once a terminal phase has been observed.
    pub fn settle(&mut self) {
        if matches!(
            self.phase,
            CreatePhase::Succeeded(_) | CreatePhase::Failed(_)
        ) {
            self.phase = CreatePhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled_form() -> CreateForm {
        CreateForm {
            name: "  nightly export ".to_string(),
            description: "dump orders".to_string(),
            task_type: "run_query".to_string(),
            parameters_text: r#"{"query": "SELECT * FROM orders"}"#.to_string(),
        }
    }

    #[test]
    fn test_defaults() {
        let form = CreateForm::default();
        assert_eq!(form.task_type, "run_query");
        assert_eq!(form.parameters_text, "{}");
    }

    #[test]
    fn test_invalid_json_is_rejected_locally() {
        let mut workflow = CreateWorkflow::new();
        workflow.open();
        workflow.form_mut().name = "x".to_string();
        workflow.form_mut().parameters_text = "{invalid".to_string();

        let err = workflow.begin_submit().expect_err("invalid json");
        assert!(err.is_validation());
        assert_eq!(workflow.phase(), &CreatePhase::Idle);
        assert!(workflow.is_open());
        assert_eq!(workflow.form().parameters_text, "{invalid");
        assert!(workflow.last_error().is_some());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut workflow = CreateWorkflow::new();
        workflow.form_mut().name = "   ".to_string();
        assert!(workflow.begin_submit().is_err());
    }

    #[test]
    fn test_any_json_value_is_accepted_as_parameters() {
        let mut form = filled_form();
        form.parameters_text = "[1, 2]".to_string();
        let spec = form.validate().expect("valid");
        assert_eq!(spec.parameters, json!([1, 2]));
        assert_eq!(spec.name, "nightly export");
    }

    #[test]
    fn test_success_closes_and_composes_task() {
        let mut workflow = CreateWorkflow::new();
        workflow.open();
        *workflow.form_mut() = filled_form();

        let request = workflow.begin_submit().expect("valid").expect("request");
        assert_eq!(request.payload.parameters["query"], "SELECT * FROM orders");
        assert!(workflow.is_submitting());
        assert!(matches!(workflow.begin_submit(), Ok(None)));

        let task = workflow
            .complete(Ok(CreateTaskResponse { id: Some(42) }))
            .expect("created");
        assert_eq!(task.id, 42);
        assert_eq!(task.name, "nightly export");
        assert_eq!(task.status, 0);
        assert_eq!(workflow.phase(), &CreatePhase::Succeeded(42));
        assert!(!workflow.is_open());
        assert_eq!(workflow.form(), &CreateForm::default());

        workflow.settle();
        assert_eq!(workflow.phase(), &CreatePhase::Idle);
    }

    #[test]
    fn test_missing_id_is_malformed_and_keeps_input() {
        let mut workflow = CreateWorkflow::new();
        workflow.open();
        *workflow.form_mut() = filled_form();
        workflow.begin_submit().expect("valid");

        let err = workflow
            .complete(Ok(CreateTaskResponse { id: None }))
            .expect_err("no id");
        assert!(matches!(err, ConsoleError::MalformedResponse(_)));
        assert!(matches!(workflow.phase(), CreatePhase::Failed(_)));
        assert!(workflow.is_open());
        assert_eq!(workflow.form(), &filled_form());
    }

    #[test]
    fn test_zero_id_is_malformed() {
        assert!(created_id(&CreateTaskResponse { id: Some(0) }).is_err());
        assert_eq!(created_id(&CreateTaskResponse { id: Some(7) }).ok(), Some(7));
    }

    #[test]
    fn test_abandon_allows_resubmission_with_same_form() {
        let mut workflow = CreateWorkflow::new();
        workflow.open();
        *workflow.form_mut() = filled_form();
        workflow.begin_submit().expect("valid").expect("request");

        workflow.abandon();
        assert_eq!(workflow.phase(), &CreatePhase::Idle);
        assert!(workflow.is_open());
        assert_eq!(workflow.form(), &filled_form());

        // a late reply for the abandoned request is not applied
        let err = workflow
            .complete(Ok(CreateTaskResponse { id: Some(9) }))
            .expect_err("nothing in flight");
        assert!(matches!(err, ConsoleError::MalformedResponse(_)));

        assert!(workflow.begin_submit().expect("valid").is_some());
        assert!(workflow.is_submitting());
    }
}
