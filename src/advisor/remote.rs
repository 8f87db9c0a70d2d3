//! HTTP client for an external move/scoring service.

use super::{AdviceRequest, MoveAdvisor};
use crate::board::{Board, Point, ScoreResult, Stone};
use crate::constants::ADVISOR_TIMEOUT_SECS;
use crate::error::AdvisorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `POST /v1/ai/move` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequestBody {
    pub board: Vec<Vec<u8>>,
    pub next_player: u8,
    pub history: Vec<String>,
}

impl From<&AdviceRequest> for MoveRequestBody {
    fn from(request: &AdviceRequest) -> Self {
        Self {
            board: request.board.to_codes(),
            next_player: request.next_player.code(),
            history: request
                .history
                .iter()
                .map(|f| f.as_str().to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResponseBody {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub confidence: f64,
    /// The service passes instead of placing.
    #[serde(default)]
    pub pass: bool,
}

/// `POST /v1/game/score` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRequestBody {
    pub board: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponseBody {
    pub black_score: f64,
    pub white_score: f64,
    /// Stone code: 1 = Black, 2 = White.
    pub winner: u8,
}

impl TryFrom<ScoreResponseBody> for ScoreResult {
    type Error = AdvisorError;

    fn try_from(body: ScoreResponseBody) -> Result<Self, Self::Error> {
        let winner = Stone::from_code(body.winner).ok_or_else(|| {
            AdvisorError::InvalidResponse(format!("unknown winner code {}", body.winner))
        })?;
        Ok(ScoreResult {
            black_score: body.black_score,
            white_score: body.white_score,
            winner,
        })
    }
}

pub struct RemoteAdvisor {
    base_url: String,
    agent: ureq::Agent,
}

impl RemoteAdvisor {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(ADVISOR_TIMEOUT_SECS))
            .user_agent("weiqi-advisor-client")
            .build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post<B: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, AdvisorError> {
        let response = self
            .agent
            .post(&self.url(path))
            .send_json(body)
            .map_err(transport_error)?;
        response
            .into_json()
            .map_err(|e| AdvisorError::InvalidResponse(e.to_string()))
    }

    /// `GET /health`.
    pub fn health_check(&self) -> Result<(), AdvisorError> {
        self.agent
            .get(&self.url("/health"))
            .call()
            .map_err(transport_error)?;
        Ok(())
    }
}

fn transport_error(err: ureq::Error) -> AdvisorError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            AdvisorError::Unavailable(format!("service returned {}: {}", code, body))
        }
        ureq::Error::Transport(transport) => AdvisorError::Unavailable(transport.to_string()),
    }
}

impl MoveAdvisor for RemoteAdvisor {
    fn suggest_move(&self, request: &AdviceRequest) -> Result<Option<Point>, AdvisorError> {
        let body = MoveRequestBody::from(request);
        let response: MoveResponseBody = self.post("/v1/ai/move", &body)?;
        if response.pass {
            return Ok(None);
        }
        log::debug!(
            "advisor suggested ({}, {}) with confidence {:.2}",
            response.x,
            response.y,
            response.confidence
        );
        Ok(Some(Point::new(response.x, response.y)))
    }

    fn score(&self, board: &Board) -> Result<ScoreResult, AdvisorError> {
        let body = ScoreRequestBody {
            board: board.to_codes(),
        };
        let response: ScoreResponseBody = self.post("/v1/game/score", &body)?;
        ScoreResult::try_from(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_request_body_shape() {
        let mut board = Board::new();
        board.set_stone(Point::new(3, 2), Some(Stone::Black)).unwrap();
        let request = AdviceRequest {
            history: vec![Board::new().fingerprint(), board.fingerprint()],
            board,
            next_player: Stone::White,
        };

        let json = serde_json::to_value(MoveRequestBody::from(&request)).unwrap();
        assert_eq!(json["next_player"], 2);
        assert_eq!(json["board"][2][3], 1);
        assert_eq!(json["history"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_move_response_defaults() {
        let body: MoveResponseBody = serde_json::from_str(r#"{"x": 4, "y": 5}"#).unwrap();
        assert_eq!((body.x, body.y), (4, 5));
        assert!(!body.pass);
        assert_eq!(body.confidence, 0.0);
    }

    #[test]
    fn test_score_response_parses_winner_code() {
        let body: ScoreResponseBody = serde_json::from_str(
            r#"{"black_score": 190.0, "white_score": 174.75, "winner": 1}"#,
        )
        .unwrap();
        let score = ScoreResult::try_from(body).unwrap();
        assert_eq!(score.winner, Stone::Black);
        assert_eq!(score.black_score, 190.0);
        assert_eq!(score.white_score, 174.75);

        let body: ScoreResponseBody = serde_json::from_str(
            r#"{"black_score": 150.0, "white_score": 214.75, "winner": 2}"#,
        )
        .unwrap();
        assert_eq!(ScoreResult::try_from(body).unwrap().winner, Stone::White);
    }

    #[test]
    fn test_score_response_rejects_unknown_winner() {
        let body = ScoreResponseBody {
            black_score: 0.0,
            white_score: 0.0,
            winner: 0,
        };
        assert!(matches!(
            ScoreResult::try_from(body),
            Err(AdvisorError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let advisor = RemoteAdvisor::new("http://localhost:8000/");
        assert_eq!(advisor.base_url(), "http://localhost:8000");
        assert_eq!(advisor.url("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_unreachable_service_is_unavailable() {
        let advisor = RemoteAdvisor::new("http://127.0.0.1:1");
        let request = AdviceRequest {
            board: Board::new(),
            next_player: Stone::Black,
            history: Vec::new(),
        };
        assert!(matches!(
            advisor.suggest_move(&request),
            Err(AdvisorError::Unavailable(_))
        ));
    }
}
