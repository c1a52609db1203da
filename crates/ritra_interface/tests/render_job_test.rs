use ritra_interface::RenderJob;
use serde_json::json;

#[test]
fn numeric_job_ids_are_stringified() {
    let job = RenderJob::from_response(json!({"id": 17}));
    assert_eq!(job.job_id.as_deref(), Some("17"));
}

#[test]
fn missing_job_id_keeps_body() {
    let body = json!({"status": "queued"});
    let job = RenderJob::from_response(body.clone());
    assert!(job.job_id.is_none());
    assert_eq!(job.response, body);
}

#[test]
fn job_id_field_precedence() {
    let job = RenderJob::from_response(json!({"id": "outer", "jobId": "render-1"}));
    assert_eq!(job.job_id.as_deref(), Some("render-1"));
}
