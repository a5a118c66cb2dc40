use crate::bidding::model::double_option;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateUrl, ValidationError};

// region:    --- Sections
// 소개 페이지 구역 (텍스트 + 최대 7개 이미지 경로)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Section {
    pub id: i64,
    pub title: String,
    pub title2: Option<String>,
    pub text: String,
    pub element1: Option<String>,
    pub element2: Option<String>,
    pub element3: Option<String>,
    pub element4: Option<String>,
    pub image1: Option<String>,
    pub image2: Option<String>,
    pub image3: Option<String>,
    pub image4: Option<String>,
    pub image5: Option<String>,
    pub image6: Option<String>,
    pub image7: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SectionInput {
    #[validate(length(min = 1, max = 75))]
    pub title: String,
    #[validate(length(max = 75))]
    pub title2: Option<String>,
    #[serde(default)]
    pub text: String,
    pub element1: Option<String>,
    pub element2: Option<String>,
    pub element3: Option<String>,
    pub element4: Option<String>,
    pub image1: Option<String>,
    pub image2: Option<String>,
    pub image3: Option<String>,
    pub image4: Option<String>,
    pub image5: Option<String>,
    pub image6: Option<String>,
    pub image7: Option<String>,
}

/// 구역 수정 (누락된 필드는 유지, null 은 비움)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SectionPatch {
    #[validate(length(min = 1, max = 75))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub title2: Option<Option<String>>,
    pub text: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub element1: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub element2: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub element3: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub element4: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image1: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image2: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image3: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image4: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image5: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image6: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image7: Option<Option<String>>,
}

impl Section {
    pub fn apply(&mut self, patch: SectionPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(text) = patch.text {
            self.text = text;
        }
        let nullable = [
            (&mut self.title2, patch.title2),
            (&mut self.element1, patch.element1),
            (&mut self.element2, patch.element2),
            (&mut self.element3, patch.element3),
            (&mut self.element4, patch.element4),
            (&mut self.image1, patch.image1),
            (&mut self.image2, patch.image2),
            (&mut self.image3, patch.image3),
            (&mut self.image4, patch.image4),
            (&mut self.image5, patch.image5),
            (&mut self.image6, patch.image6),
            (&mut self.image7, patch.image7),
        ];
        for (field, value) in nullable {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}
// endregion: --- Sections

// region:    --- Categories
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}
// endregion: --- Categories

// region:    --- Gallery Items
/// 갤러리 작품 (카테고리 이름 목록 포함)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct GalleryItem {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub description: String,
    pub image: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GalleryItemInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub artist: String,
    pub description: String,
    #[validate(length(min = 1))]
    pub image: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// 작품 수정 (`categories` 가 오면 카테고리 집합 교체)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct GalleryItemPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub artist: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub image: Option<String>,
    pub categories: Option<Vec<String>>,
}

/// 카테고리 이름 정리 (공백 제거, 빈 값/중복 제외)
pub fn normalize_category_names(names: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(names.len());
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        if !cleaned.iter().any(|c| c == name) {
            cleaned.push(name.to_string());
        }
    }
    cleaned
}
// endregion: --- Gallery Items

// region:    --- Exhibitions
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Exhibition {
    pub id: i64,
    pub title: Option<String>,
    pub title2: Option<String>,
    pub title3: Option<String>,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub element1: Option<String>,
    pub element2: Option<String>,
    pub element3: Option<String>,
    pub element4: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_exhibition_dates"))]
pub struct ExhibitionInput {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 200))]
    pub title2: Option<String>,
    #[validate(length(max = 200))]
    pub title3: Option<String>,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(url)]
    pub link: Option<String>,
    pub image: Option<String>,
    pub element1: Option<String>,
    pub element2: Option<String>,
    pub element3: Option<String>,
    pub element4: Option<String>,
}

fn validate_exhibition_dates(input: &ExhibitionInput) -> Result<(), ValidationError> {
    if input.end_date < input.start_date {
        let mut err = ValidationError::new("date_range");
        err.message = Some("종료일은 시작일 이후여야 합니다.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
pub struct ExhibitionPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub title2: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub title3: Option<Option<String>>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub link: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub element1: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub element2: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub element3: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub element4: Option<Option<String>>,
}

impl Exhibition {
    pub fn apply(&mut self, patch: ExhibitionPatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        let nullable = [
            (&mut self.title, patch.title),
            (&mut self.title2, patch.title2),
            (&mut self.title3, patch.title3),
            (&mut self.link, patch.link),
            (&mut self.image, patch.image),
            (&mut self.element1, patch.element1),
            (&mut self.element2, patch.element2),
            (&mut self.element3, patch.element3),
            (&mut self.element4, patch.element4),
        ];
        for (field, value) in nullable {
            if let Some(value) = value {
                *field = value;
            }
        }
    }

    /// 수정 결과 검증 (링크 형식, 기간)
    pub fn check(&self) -> Result<(), ValidationError> {
        if let Some(link) = self.link.as_deref() {
            if !link.validate_url() {
                let mut err = ValidationError::new("url");
                err.message = Some("올바른 URL 이 아닙니다.".into());
                return Err(err);
            }
        }
        if self.end_date < self.start_date {
            let mut err = ValidationError::new("date_range");
            err.message = Some("종료일은 시작일 이후여야 합니다.".into());
            return Err(err);
        }
        Ok(())
    }
}
// endregion: --- Exhibitions

// region:    --- FAQ
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FaqInput {
    #[validate(length(min = 1, max = 2000))]
    pub question: String,
    #[validate(length(min = 1, max = 2000))]
    pub answer: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct FaqPatch {
    #[validate(length(min = 1, max = 2000))]
    pub question: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub answer: Option<String>,
}
// endregion: --- FAQ

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn section() -> Section {
        Section {
            id: 1,
            title: "About".into(),
            title2: Some("Gallery".into()),
            text: "text".into(),
            element1: None,
            element2: None,
            element3: None,
            element4: None,
            image1: Some("a.jpg".into()),
            image2: None,
            image3: None,
            image4: None,
            image5: None,
            image6: None,
            image7: None,
        }
    }

    #[test]
    fn section_patch_keeps_missing_and_clears_null() {
        let patch: SectionPatch =
            serde_json::from_str(r#"{"title": "New", "title2": null, "image2": "b.jpg"}"#).unwrap();
        let mut s = section();
        s.apply(patch);
        assert_eq!(s.title, "New");
        assert_eq!(s.title2, None);
        assert_eq!(s.image1.as_deref(), Some("a.jpg"));
        assert_eq!(s.image2.as_deref(), Some("b.jpg"));
        assert_eq!(s.text, "text");
    }

    #[test]
    fn category_names_are_trimmed_and_deduplicated() {
        let names = vec![" Oil ".to_string(), "Oil".into(), "".into(), "Sculpture".into()];
        assert_eq!(normalize_category_names(&names), vec!["Oil", "Sculpture"]);
    }

    #[test]
    fn exhibition_link_must_be_url() {
        let now = Utc::now();
        let input = ExhibitionInput {
            title: Some("Spring".into()),
            title2: None,
            title3: None,
            description: "d".into(),
            start_date: now,
            end_date: now + Duration::days(30),
            link: Some("not a url".into()),
            image: None,
            element1: None,
            element2: None,
            element3: None,
            element4: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn exhibition_patch_is_checked_after_apply() {
        let now = Utc::now();
        let mut exhibition = Exhibition {
            id: 1,
            title: None,
            title2: None,
            title3: None,
            description: "d".into(),
            start_date: now,
            end_date: now + Duration::days(1),
            link: Some("https://gallery.example.com".into()),
            image: None,
            element1: None,
            element2: None,
            element3: None,
            element4: None,
        };
        assert!(exhibition.check().is_ok());

        exhibition.apply(ExhibitionPatch {
            link: Some(Some("nope".into())),
            ..Default::default()
        });
        assert!(exhibition.check().is_err());

        exhibition.apply(ExhibitionPatch {
            link: Some(None),
            end_date: Some(now - Duration::days(1)),
            ..Default::default()
        });
        assert!(exhibition.check().is_err());
    }
}
