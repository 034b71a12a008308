pub(super) mod api {
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::{Extension, Json};
    use axum_extra::extract::Query;
    use serde::Deserialize;

    use crate::message::model::{Message, MessageDto};
    use crate::{message, user};

    #[derive(Deserialize)]
    pub struct CreateParams {
        recipient: user::Sub,
        subject: String,
        text: String,
    }

    pub async fn create(
        Extension(logged_sub): Extension<user::Sub>,
        message_service: State<message::Service>,
        Json(params): Json<CreateParams>,
    ) -> crate::Result<(StatusCode, Json<MessageDto>)> {
        let message = Message::new(logged_sub, params.recipient, &params.subject, &params.text);
        let dto = message_service.create(message).await?;
        Ok((StatusCode::CREATED, Json(dto)))
    }

    #[derive(Deserialize)]
    pub struct FindAllParams {
        recipient: Option<user::Sub>,
        limit: Option<i64>,
        before: Option<i64>,
    }

    pub async fn find_all(
        Extension(logged_sub): Extension<user::Sub>,
        Query(params): Query<FindAllParams>,
        message_service: State<message::Service>,
    ) -> crate::Result<Json<Vec<MessageDto>>> {
        let recipient = params
            .recipient
            .ok_or(message::Error::QueryParamRequired("recipient".to_owned()))?;

        let messages = message_service
            .find_chat_history(&logged_sub, &recipient, params.limit, params.before)
            .await?;

        Ok(Json(messages))
    }

    pub async fn mark_seen(
        Extension(logged_sub): Extension<user::Sub>,
        id: Path<message::Id>,
        message_service: State<message::Service>,
    ) -> crate::Result<StatusCode> {
        message_service.mark_seen(&logged_sub, &id).await?;
        Ok(StatusCode::NO_CONTENT)
    }

    pub async fn delete(
        Extension(logged_sub): Extension<user::Sub>,
        id: Path<message::Id>,
        message_service: State<message::Service>,
    ) -> crate::Result<StatusCode> {
        message_service.delete(&logged_sub, &id).await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
