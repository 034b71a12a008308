pub(super) mod api {
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::{Extension, Json};

    use crate::thread::model::ThreadDto;
    use crate::{thread, user};

    pub async fn find_all(
        Extension(logged_sub): Extension<user::Sub>,
        thread_service: State<thread::Service>,
    ) -> crate::Result<Json<Vec<ThreadDto>>> {
        let threads = thread_service.find_all(&logged_sub).await?;
        Ok(Json(threads))
    }

    pub async fn find_one(
        Extension(logged_sub): Extension<user::Sub>,
        id: Path<thread::Id>,
        thread_service: State<thread::Service>,
    ) -> crate::Result<Json<ThreadDto>> {
        let thread = thread_service.find_by_id_and_sub(&id, &logged_sub).await?;
        Ok(Json(thread))
    }

    pub async fn mark_read(
        Extension(logged_sub): Extension<user::Sub>,
        id: Path<thread::Id>,
        thread_service: State<thread::Service>,
    ) -> crate::Result<StatusCode> {
        thread_service.mark_read(&id, &logged_sub).await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
