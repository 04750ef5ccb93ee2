use crate::error::AnalysisFailure;
use crate::models::ParamsAnalyze;
use axum::{
    extract::{FromRequest, Query, Request},
    http::Method,
    Json,
};

/// `{url}` from the query string on GET, from a JSON body otherwise.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest(pub ParamsAnalyze);

impl<S> FromRequest<S> for AnalyzeRequest
where
    S: Send + Sync,
{
    type Rejection = AnalysisFailure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.method() == Method::GET {
            let Query(params) = Query::<ParamsAnalyze>::try_from_uri(req.uri())
                .map_err(|e| AnalysisFailure::InvalidRequest(e.body_text()))?;
            return Ok(AnalyzeRequest(params));
        }

        let Json(params) = Json::<ParamsAnalyze>::from_request(req, state)
            .await
            .map_err(|e| AnalysisFailure::InvalidRequest(e.body_text()))?;
        Ok(AnalyzeRequest(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;

    #[tokio::test]
    async fn reads_query_on_get() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/analyze/lighthouse?url=example.com")
            .body(Body::empty())
            .unwrap();
        let AnalyzeRequest(params) = AnalyzeRequest::from_request(req, &()).await.unwrap();
        assert_eq!(params.url, "example.com");
    }

    #[tokio::test]
    async fn reads_json_on_post() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/analyze/lighthouse")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"url":"https://example.com"}"#))
            .unwrap();
        let AnalyzeRequest(params) = AnalyzeRequest::from_request(req, &()).await.unwrap();
        assert_eq!(params.url, "https://example.com");
    }

    #[tokio::test]
    async fn missing_url_is_invalid_request() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/analyze/lighthouse")
            .body(Body::empty())
            .unwrap();
        let err = AnalyzeRequest::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AnalysisFailure::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn post_without_json_content_type_is_invalid_request() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/analyze/lighthouse")
            .body(Body::from("url=example.com"))
            .unwrap();
        let err = AnalyzeRequest::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AnalysisFailure::InvalidRequest(_)));
    }
}
