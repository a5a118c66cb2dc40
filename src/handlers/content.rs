/// 갤러리 콘텐츠 핸들러 (조회는 공개, 쓰기는 스태프)
// region:    --- Imports
use super::extract::{AppJson, AppPath, AppQuery};
use crate::accounts::extract::StaffUser;
use crate::content::model::{
    Category, CategoryInput, Exhibition, ExhibitionInput, ExhibitionPatch, Faq, FaqInput,
    FaqPatch, GalleryItem, GalleryItemInput, GalleryItemPatch, Section, SectionInput, SectionPatch,
};
use crate::content::store;
use crate::error::AppResult;
use crate::pagination::{Page, PageQuery};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
// endregion: --- Imports

// region:    --- Sections
pub async fn list_sections(State(state): State<AppState>) -> AppResult<Json<Vec<Section>>> {
    Ok(Json(store::list_sections(&state.db_manager).await?))
}

pub async fn get_section(State(state): State<AppState>, AppPath(section_id): AppPath<i64>) -> AppResult<Json<Section>> {
    Ok(Json(store::get_section(&state.db_manager, section_id).await?))
}

pub async fn create_section(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppJson(input): AppJson<SectionInput>,
) -> AppResult<(StatusCode, Json<Section>)> {
    input.validate()?;
    Ok((StatusCode::CREATED, Json(store::create_section(&state.db_manager, input).await?)))
}

pub async fn update_section(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(section_id): AppPath<i64>,
    AppJson(patch): AppJson<SectionPatch>,
) -> AppResult<Json<Section>> {
    patch.validate()?;
    Ok(Json(store::update_section(&state.db_manager, section_id, patch).await?))
}

pub async fn delete_section(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(section_id): AppPath<i64>,
) -> AppResult<StatusCode> {
    store::delete_section(&state.db_manager, section_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
// endregion: --- Sections

// region:    --- Categories
pub async fn list_categories(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(store::list_categories(&state.db_manager).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppJson(input): AppJson<CategoryInput>,
) -> AppResult<(StatusCode, Json<Category>)> {
    input.validate()?;
    Ok((StatusCode::CREATED, Json(store::create_category(&state.db_manager, input).await?)))
}
// endregion: --- Categories

// region:    --- Gallery Items
pub async fn list_gallery_items(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<Json<Page<GalleryItem>>> {
    let page = store::list_gallery_items(&state.db_manager, page, state.page_size(), "/api/gallery-items").await?;
    Ok(Json(page))
}

pub async fn get_gallery_item(State(state): State<AppState>, AppPath(item_id): AppPath<i64>) -> AppResult<Json<GalleryItem>> {
    Ok(Json(store::get_gallery_item(&state.db_manager, item_id).await?))
}

pub async fn create_gallery_item(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppJson(input): AppJson<GalleryItemInput>,
) -> AppResult<(StatusCode, Json<GalleryItem>)> {
    input.validate()?;
    Ok((StatusCode::CREATED, Json(store::create_gallery_item(&state.db_manager, input).await?)))
}

pub async fn update_gallery_item(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(item_id): AppPath<i64>,
    AppJson(patch): AppJson<GalleryItemPatch>,
) -> AppResult<Json<GalleryItem>> {
    patch.validate()?;
    Ok(Json(store::update_gallery_item(&state.db_manager, item_id, patch).await?))
}

pub async fn delete_gallery_item(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(item_id): AppPath<i64>,
) -> AppResult<StatusCode> {
    store::delete_gallery_item(&state.db_manager, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
// endregion: --- Gallery Items

// region:    --- Exhibitions
pub async fn list_exhibitions(State(state): State<AppState>) -> AppResult<Json<Vec<Exhibition>>> {
    Ok(Json(store::list_exhibitions(&state.db_manager).await?))
}

pub async fn get_exhibition(
    State(state): State<AppState>,
    AppPath(exhibition_id): AppPath<i64>,
) -> AppResult<Json<Exhibition>> {
    Ok(Json(store::get_exhibition(&state.db_manager, exhibition_id).await?))
}

pub async fn create_exhibition(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppJson(input): AppJson<ExhibitionInput>,
) -> AppResult<(StatusCode, Json<Exhibition>)> {
    input.validate()?;
    Ok((StatusCode::CREATED, Json(store::create_exhibition(&state.db_manager, input).await?)))
}

pub async fn update_exhibition(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(exhibition_id): AppPath<i64>,
    AppJson(patch): AppJson<ExhibitionPatch>,
) -> AppResult<Json<Exhibition>> {
    Ok(Json(store::update_exhibition(&state.db_manager, exhibition_id, patch).await?))
}

pub async fn delete_exhibition(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(exhibition_id): AppPath<i64>,
) -> AppResult<StatusCode> {
    store::delete_exhibition(&state.db_manager, exhibition_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
// endregion: --- Exhibitions

// region:    --- FAQ
pub async fn list_faqs(State(state): State<AppState>) -> AppResult<Json<Vec<Faq>>> {
    Ok(Json(store::list_faqs(&state.db_manager).await?))
}

pub async fn get_faq(State(state): State<AppState>, AppPath(faq_id): AppPath<i64>) -> AppResult<Json<Faq>> {
    Ok(Json(store::get_faq(&state.db_manager, faq_id).await?))
}

pub async fn create_faq(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppJson(input): AppJson<FaqInput>,
) -> AppResult<(StatusCode, Json<Faq>)> {
    input.validate()?;
    Ok((StatusCode::CREATED, Json(store::create_faq(&state.db_manager, input).await?)))
}

pub async fn update_faq(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(faq_id): AppPath<i64>,
    AppJson(patch): AppJson<FaqPatch>,
) -> AppResult<Json<Faq>> {
    patch.validate()?;
    Ok(Json(store::update_faq(&state.db_manager, faq_id, patch).await?))
}

pub async fn delete_faq(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(faq_id): AppPath<i64>,
) -> AppResult<StatusCode> {
    store::delete_faq(&state.db_manager, faq_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
// endregion: --- FAQ
