use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use jyotish_agents::ChatRequest;
use jyotish_common::{ConversationTurn, Error, UserIdentity};
use jyotish_kundali::{BirthForm, KundaliComposite};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, warn};

use crate::state::SharedState;

type ApiResponse = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiResponse {
    (status, Json(json!({ "error": message.into() })))
}

/// Unparseable or non-JSON bodies get the same `{"error"}` shape as other 4xx.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiResponse> {
    body.map(|Json(value)| value)
        .map_err(|rejection| api_error(rejection.status(), rejection.body_text()))
}

/// Non-birth fields of the chart form, echoed back in `userInfo`.
#[derive(Debug, Default, Deserialize)]
struct ChartOwner {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    pob: Option<String>,
}

/// `POST /api/kundali`: fetch the composite chart for a birth form.
pub async fn kundali(
    State(state): State<SharedState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse {
    let body = match json_body(body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let owner: ChartOwner = serde_json::from_value(body.clone()).unwrap_or_default();

    let form: BirthForm = match serde_json::from_value(body) {
        Ok(form) => form,
        Err(e) => {
            return api_error(StatusCode::BAD_REQUEST, format!("Invalid birth data: {e}"));
        }
    };

    let birth = match form.into_birth_data() {
        Ok(birth) => birth,
        Err(Error::Validation(message)) => return api_error(StatusCode::BAD_REQUEST, message),
        Err(e) => return api_error(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let composite = state.kundali.fetch_all_facets(&birth).await;

    if !composite.is_usable() {
        let details = serde_json::to_string(&composite).unwrap_or_else(|_| "unknown".to_string());
        error!("Invalid astrology API response: {}", details);
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "error": "Unable to fetch valid kundali data. Please check your Astrology API key/user ID and try again.",
                "details": details,
            })),
        );
    }

    let user_info = UserIdentity {
        name: owner.name,
        dob: Some(birth.date_label()),
        tob: Some(birth.time_label()),
        pob: owner.pob,
    };

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": composite,
            "userInfo": user_info,
        })),
    )
}

/// `POST /api/chat`: one chart-aware reply for the posted conversation.
pub async fn chat(
    State(state): State<SharedState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse {
    let body = match json_body(body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let request = match parse_chat_request(&body) {
        Ok(request) => request,
        Err(message) => return api_error(StatusCode::BAD_REQUEST, message),
    };

    match state.chat.respond(&request).await {
        Ok(reply) => (StatusCode::OK, Json(json!({ "reply": reply }))),
        Err(e) => {
            error!("Chat error: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn field<'a>(body: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| body.get(*name))
        .filter(|value| !value.is_null())
}

fn parse_chat_request(body: &Value) -> Result<ChatRequest, String> {
    let messages = field(body, &["messages", "conversationHistory"])
        .filter(|v| v.is_array())
        .ok_or_else(|| "messages array is required".to_string())?;

    let conversation: Vec<ConversationTurn> = serde_json::from_value(messages.clone())
        .map_err(|e| format!("Invalid message in conversation: {e}"))?;

    let chart_context = match field(body, &["kundaliContext", "chartContext"]) {
        Some(value) => Some(
            serde_json::from_value::<KundaliComposite>(value.clone())
                .map_err(|e| format!("Invalid kundaliContext: {e}"))?,
        ),
        None => None,
    };

    let user_identity = match field(body, &["userInfo", "userIdentity"]) {
        Some(value) => match serde_json::from_value::<UserIdentity>(value.clone()) {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!("ignoring malformed userInfo: {}", e);
                None
            }
        },
        None => None,
    };

    Ok(ChatRequest {
        conversation,
        chart_context,
        user_identity,
    })
}
