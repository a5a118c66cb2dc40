/// 콘텐츠 저장소
// region:    --- Imports
use super::model::{
    normalize_category_names, Category, CategoryInput, Exhibition, ExhibitionInput,
    ExhibitionPatch, Faq, FaqInput, FaqPatch, GalleryItem, GalleryItemInput, GalleryItemPatch,
    Section, SectionInput, SectionPatch,
};
use super::queries;
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::pagination::{Page, PageQuery, PageWindow};
use sqlx::PgConnection;
use tracing::info;
use validator::ValidationErrors;
// endregion: --- Imports

fn ensure_deleted(rows_affected: u64, message: &str) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::not_found(message));
    }
    Ok(())
}

// region:    --- Sections
const SECTION_NOT_FOUND: &str = "구역을 찾을 수 없습니다.";

pub async fn list_sections(db_manager: &DatabaseManager) -> AppResult<Vec<Section>> {
    Ok(sqlx::query_as::<_, Section>(queries::LIST_SECTIONS)
        .fetch_all(db_manager.pool())
        .await?)
}

pub async fn get_section(db_manager: &DatabaseManager, section_id: i64) -> AppResult<Section> {
    sqlx::query_as::<_, Section>(queries::GET_SECTION)
        .bind(section_id)
        .fetch_optional(db_manager.pool())
        .await?
        .ok_or_else(|| AppError::not_found(SECTION_NOT_FOUND))
}

pub async fn create_section(db_manager: &DatabaseManager, input: SectionInput) -> AppResult<Section> {
    let section = sqlx::query_as::<_, Section>(queries::INSERT_SECTION)
        .bind(input.title)
        .bind(input.title2)
        .bind(input.text)
        .bind(input.element1)
        .bind(input.element2)
        .bind(input.element3)
        .bind(input.element4)
        .bind(input.image1)
        .bind(input.image2)
        .bind(input.image3)
        .bind(input.image4)
        .bind(input.image5)
        .bind(input.image6)
        .bind(input.image7)
        .fetch_one(db_manager.pool())
        .await?;
    info!("{:<12} --> 구역 생성 id: {}", "Command", section.id);
    Ok(section)
}

pub async fn update_section(
    db_manager: &DatabaseManager,
    section_id: i64,
    patch: SectionPatch,
) -> AppResult<Section> {
    let mut section = get_section(db_manager, section_id).await?;
    section.apply(patch);

    let section = sqlx::query_as::<_, Section>(queries::UPDATE_SECTION)
        .bind(&section.title)
        .bind(&section.title2)
        .bind(&section.text)
        .bind(&section.element1)
        .bind(&section.element2)
        .bind(&section.element3)
        .bind(&section.element4)
        .bind(&section.image1)
        .bind(&section.image2)
        .bind(&section.image3)
        .bind(&section.image4)
        .bind(&section.image5)
        .bind(&section.image6)
        .bind(&section.image7)
        .bind(section.id)
        .fetch_optional(db_manager.pool())
        .await?
        .ok_or_else(|| AppError::not_found(SECTION_NOT_FOUND))?;
    info!("{:<12} --> 구역 수정 id: {}", "Command", section.id);
    Ok(section)
}

pub async fn delete_section(db_manager: &DatabaseManager, section_id: i64) -> AppResult<()> {
    let result = sqlx::query(queries::DELETE_SECTION)
        .bind(section_id)
        .execute(db_manager.pool())
        .await?;
    ensure_deleted(result.rows_affected(), SECTION_NOT_FOUND)
}
// endregion: --- Sections

// region:    --- Categories
pub async fn list_categories(db_manager: &DatabaseManager) -> AppResult<Vec<Category>> {
    Ok(sqlx::query_as::<_, Category>(queries::LIST_CATEGORIES)
        .fetch_all(db_manager.pool())
        .await?)
}

pub async fn create_category(db_manager: &DatabaseManager, input: CategoryInput) -> AppResult<Category> {
    let category = sqlx::query_as::<_, Category>(queries::INSERT_CATEGORY)
        .bind(input.name.trim())
        .fetch_one(db_manager.pool())
        .await?;
    info!("{:<12} --> 카테고리 생성 id: {}", "Command", category.id);
    Ok(category)
}
// endregion: --- Categories

// region:    --- Gallery Items
const GALLERY_ITEM_NOT_FOUND: &str = "작품을 찾을 수 없습니다.";

pub async fn list_gallery_items(
    db_manager: &DatabaseManager,
    page: PageQuery,
    page_size: i64,
    path: &'static str,
) -> AppResult<Page<GalleryItem>> {
    let count: i64 = sqlx::query_scalar(queries::COUNT_GALLERY_ITEMS)
        .fetch_one(db_manager.pool())
        .await?;
    let window = PageWindow::resolve(&page, count, page_size)?;
    let results = sqlx::query_as::<_, GalleryItem>(queries::LIST_GALLERY_ITEMS)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(db_manager.pool())
        .await?;
    Ok(Page::new(window, count, results, path))
}

pub async fn get_gallery_item(db_manager: &DatabaseManager, item_id: i64) -> AppResult<GalleryItem> {
    sqlx::query_as::<_, GalleryItem>(queries::GET_GALLERY_ITEM)
        .bind(item_id)
        .fetch_optional(db_manager.pool())
        .await?
        .ok_or_else(|| AppError::not_found(GALLERY_ITEM_NOT_FOUND))
}

/// 카테고리 집합 교체
async fn replace_categories(
    conn: &mut PgConnection,
    item_id: i64,
    names: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query(queries::CLEAR_GALLERY_ITEM_CATEGORIES)
        .bind(item_id)
        .execute(&mut *conn)
        .await?;
    let names = normalize_category_names(names);
    if !names.is_empty() {
        sqlx::query(queries::LINK_GALLERY_ITEM_CATEGORIES)
            .bind(item_id)
            .bind(&names)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn create_gallery_item(
    db_manager: &DatabaseManager,
    input: GalleryItemInput,
) -> AppResult<GalleryItem> {
    let item = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let item_id: i64 = sqlx::query_scalar(queries::INSERT_GALLERY_ITEM)
                    .bind(&input.title)
                    .bind(&input.artist)
                    .bind(&input.description)
                    .bind(&input.image)
                    .fetch_one(&mut **tx)
                    .await?;
                replace_categories(&mut **tx, item_id, &input.categories).await?;
                sqlx::query_as::<_, GalleryItem>(queries::GET_GALLERY_ITEM)
                    .bind(item_id)
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(AppError::from)
            })
        })
        .await?;
    info!("{:<12} --> 작품 생성 id: {}", "Command", item.id);
    Ok(item)
}

/// 부분 수정 (`categories` 가 있을 때만 카테고리 교체)
pub async fn update_gallery_item(
    db_manager: &DatabaseManager,
    item_id: i64,
    patch: GalleryItemPatch,
) -> AppResult<GalleryItem> {
    let item = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_scalar::<_, i64>(queries::UPDATE_GALLERY_ITEM)
                    .bind(&patch.title)
                    .bind(&patch.artist)
                    .bind(&patch.description)
                    .bind(&patch.image)
                    .bind(item_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(|| AppError::not_found(GALLERY_ITEM_NOT_FOUND))?;
                if let Some(names) = &patch.categories {
                    replace_categories(&mut **tx, item_id, names).await?;
                }
                sqlx::query_as::<_, GalleryItem>(queries::GET_GALLERY_ITEM)
                    .bind(item_id)
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(AppError::from)
            })
        })
        .await?;
    info!("{:<12} --> 작품 수정 id: {}", "Command", item.id);
    Ok(item)
}

pub async fn delete_gallery_item(db_manager: &DatabaseManager, item_id: i64) -> AppResult<()> {
    let result = sqlx::query(queries::DELETE_GALLERY_ITEM)
        .bind(item_id)
        .execute(db_manager.pool())
        .await?;
    ensure_deleted(result.rows_affected(), GALLERY_ITEM_NOT_FOUND)
}
// endregion: --- Gallery Items

// region:    --- Exhibitions
const EXHIBITION_NOT_FOUND: &str = "전시를 찾을 수 없습니다.";

pub async fn list_exhibitions(db_manager: &DatabaseManager) -> AppResult<Vec<Exhibition>> {
    Ok(sqlx::query_as::<_, Exhibition>(queries::LIST_EXHIBITIONS)
        .fetch_all(db_manager.pool())
        .await?)
}

pub async fn get_exhibition(db_manager: &DatabaseManager, exhibition_id: i64) -> AppResult<Exhibition> {
    sqlx::query_as::<_, Exhibition>(queries::GET_EXHIBITION)
        .bind(exhibition_id)
        .fetch_optional(db_manager.pool())
        .await?
        .ok_or_else(|| AppError::not_found(EXHIBITION_NOT_FOUND))
}

pub async fn create_exhibition(
    db_manager: &DatabaseManager,
    input: ExhibitionInput,
) -> AppResult<Exhibition> {
    let exhibition = sqlx::query_as::<_, Exhibition>(queries::INSERT_EXHIBITION)
        .bind(input.title)
        .bind(input.title2)
        .bind(input.title3)
        .bind(input.description)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.link)
        .bind(input.image)
        .bind(input.element1)
        .bind(input.element2)
        .bind(input.element3)
        .bind(input.element4)
        .fetch_one(db_manager.pool())
        .await?;
    info!("{:<12} --> 전시 생성 id: {}", "Command", exhibition.id);
    Ok(exhibition)
}

pub async fn update_exhibition(
    db_manager: &DatabaseManager,
    exhibition_id: i64,
    patch: ExhibitionPatch,
) -> AppResult<Exhibition> {
    let mut exhibition = get_exhibition(db_manager, exhibition_id).await?;
    exhibition.apply(patch);
    exhibition.check().map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("exhibition", e);
        AppError::Validation(errors)
    })?;

    let exhibition = sqlx::query_as::<_, Exhibition>(queries::UPDATE_EXHIBITION)
        .bind(&exhibition.title)
        .bind(&exhibition.title2)
        .bind(&exhibition.title3)
        .bind(&exhibition.description)
        .bind(exhibition.start_date)
        .bind(exhibition.end_date)
        .bind(&exhibition.link)
        .bind(&exhibition.image)
        .bind(&exhibition.element1)
        .bind(&exhibition.element2)
        .bind(&exhibition.element3)
        .bind(&exhibition.element4)
        .bind(exhibition.id)
        .fetch_optional(db_manager.pool())
        .await?
        .ok_or_else(|| AppError::not_found(EXHIBITION_NOT_FOUND))?;
    info!("{:<12} --> 전시 수정 id: {}", "Command", exhibition.id);
    Ok(exhibition)
}

pub async fn delete_exhibition(db_manager: &DatabaseManager, exhibition_id: i64) -> AppResult<()> {
    let result = sqlx::query(queries::DELETE_EXHIBITION)
        .bind(exhibition_id)
        .execute(db_manager.pool())
        .await?;
    ensure_deleted(result.rows_affected(), EXHIBITION_NOT_FOUND)
}
// endregion: --- Exhibitions

// region:    --- FAQ
const FAQ_NOT_FOUND: &str = "FAQ 를 찾을 수 없습니다.";

pub async fn list_faqs(db_manager: &DatabaseManager) -> AppResult<Vec<Faq>> {
    Ok(sqlx::query_as::<_, Faq>(queries::LIST_FAQS)
        .fetch_all(db_manager.pool())
        .await?)
}

pub async fn get_faq(db_manager: &DatabaseManager, faq_id: i64) -> AppResult<Faq> {
    sqlx::query_as::<_, Faq>(queries::GET_FAQ)
        .bind(faq_id)
        .fetch_optional(db_manager.pool())
        .await?
        .ok_or_else(|| AppError::not_found(FAQ_NOT_FOUND))
}

pub async fn create_faq(db_manager: &DatabaseManager, input: FaqInput) -> AppResult<Faq> {
    let faq = sqlx::query_as::<_, Faq>(queries::INSERT_FAQ)
        .bind(input.question)
        .bind(input.answer)
        .fetch_one(db_manager.pool())
        .await?;
    info!("{:<12} --> FAQ 생성 id: {}", "Command", faq.id);
    Ok(faq)
}

pub async fn update_faq(db_manager: &DatabaseManager, faq_id: i64, patch: FaqPatch) -> AppResult<Faq> {
    sqlx::query_as::<_, Faq>(queries::UPDATE_FAQ)
        .bind(patch.question)
        .bind(patch.answer)
        .bind(faq_id)
        .fetch_optional(db_manager.pool())
        .await?
        .ok_or_else(|| AppError::not_found(FAQ_NOT_FOUND))
}

pub async fn delete_faq(db_manager: &DatabaseManager, faq_id: i64) -> AppResult<()> {
    let result = sqlx::query(queries::DELETE_FAQ)
        .bind(faq_id)
        .execute(db_manager.pool())
        .await?;
    ensure_deleted(result.rows_affected(), FAQ_NOT_FOUND)
}
// endregion: --- FAQ
