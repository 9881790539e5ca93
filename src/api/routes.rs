//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::domain::OperationContext;
use crate::error::AppResult;
use crate::handlers::{
    AddBookCommand, AddBookHandler, AddBookResult, BorrowBookCommand, BorrowBookHandler,
    BorrowBookResult, GetBookHandler, GetBookQuery, GetBookResult, ListBooksHandler,
    ListBooksQuery, ListBooksResult, ReturnBookCommand, ReturnBookHandler, ReturnBookResult,
};

use super::AppState;

// =========================================================================
// Request types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowBookRequest {
    #[serde(default)]
    pub borrower_email: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

// =========================================================================
// Router
// =========================================================================

/// Create the API router (mounted under `/api/v1`)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/books", post(add_book).get(list_books))
        .route("/books/:book_id", get(get_book))
        .route("/books/:book_id/borrow", post(borrow_book))
        .route("/books/:book_id/return", post(return_book))
}

// =========================================================================
// Book endpoints
// =========================================================================

/// Add a book to the catalog
async fn add_book(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<AddBookRequest>,
) -> AppResult<(StatusCode, Json<AddBookResult>)> {
    let handler = AddBookHandler::new(state.repository);
    let result = handler
        .execute(AddBookCommand::new(request.title, request.author), &context)
        .await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// List books, newest first
async fn list_books(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ListBooksResult>> {
    let handler = ListBooksHandler::new(state.repository);
    let result = handler
        .execute(ListBooksQuery::new(params.limit, params.offset), &context)
        .await?;

    Ok(Json(result))
}

async fn get_book(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(book_id): Path<String>,
) -> AppResult<Json<GetBookResult>> {
    let handler = GetBookHandler::new(state.repository);
    let result = handler.execute(GetBookQuery::new(book_id), &context).await?;

    Ok(Json(result))
}

/// Lend a book for the standard loan period
async fn borrow_book(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(book_id): Path<String>,
    Json(request): Json<BorrowBookRequest>,
) -> AppResult<Json<BorrowBookResult>> {
    let handler = BorrowBookHandler::new(state.repository);
    let result = handler
        .execute(BorrowBookCommand::new(book_id, request.borrower_email), &context)
        .await?;

    Ok(Json(result))
}

async fn return_book(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(book_id): Path<String>,
) -> AppResult<Json<ReturnBookResult>> {
    let handler = ReturnBookHandler::new(state.repository);
    let result = handler
        .execute(ReturnBookCommand::new(book_id), &context)
        .await?;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_book_request_deserialize() {
        let json = r#"{ "title": "Clean Code", "author": "Robert Martin" }"#;

        let request: AddBookRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.title, "Clean Code");
        assert_eq!(request.author, "Robert Martin");
    }

    #[test]
    fn test_borrow_request_missing_email_is_empty() {
        let request: BorrowBookRequest = serde_json::from_str("{}").unwrap();
        assert!(request.borrower_email.is_empty());
    }

    #[test]
    fn test_list_params_defaults() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.limit, 0);
        assert_eq!(params.offset, 0);
    }
}
