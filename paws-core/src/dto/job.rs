//! Job registration DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobDefinition;

/// Body of `PUT /v1/jobs`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterJobRequest {
    pub job: JobDefinition,
}

/// Response to a successful registration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterJobResponse {
    #[serde(rename = "EvalID", default)]
    pub eval_id: String,
    #[serde(default)]
    pub eval_create_index: u64,
    #[serde(default)]
    pub job_modify_index: u64,
    #[serde(default)]
    pub warnings: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wraps_job() {
        let req = RegisterJobRequest {
            job: JobDefinition::batch("j1", "us", 1),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["Job"]["ID"], "j1");
    }

    #[test]
    fn test_response_parses_api_payload() {
        let body = r#"{
            "EvalID": "d092fdc0-e1fd-2536-67d8-43af8ca798ac",
            "EvalCreateIndex": 35,
            "JobModifyIndex": 34,
            "Warnings": "",
            "Index": 35,
            "LastContact": 0,
            "KnownLeader": false
        }"#;
        let resp: RegisterJobResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.eval_id, "d092fdc0-e1fd-2536-67d8-43af8ca798ac");
        assert_eq!(resp.eval_create_index, 35);
        assert_eq!(resp.job_modify_index, 34);
        assert_eq!(resp.warnings.as_deref(), Some(""));
    }
}
