macro_rules! section_columns {
    () => {
        "id, title, title2, text, element1, element2, element3, element4, \
         image1, image2, image3, image4, image5, image6, image7"
    };
}

macro_rules! exhibition_columns {
    () => {
        "id, title, title2, title3, description, start_date, end_date, link, image, \
         element1, element2, element3, element4"
    };
}

/// 작품 + 카테고리 이름 배열
macro_rules! gallery_item_select {
    () => {
        "SELECT g.id, g.title, g.artist, g.description, g.image, \
         COALESCE(array_agg(TRIM(c.name) ORDER BY c.name) FILTER (WHERE c.id IS NOT NULL), \
         ARRAY[]::TEXT[]) AS categories \
         FROM gallery_items g \
         LEFT JOIN gallery_item_categories gc ON gc.gallery_item_id = g.id \
         LEFT JOIN categories c ON c.id = gc.category_id "
    };
}

// region:    --- Sections
pub const LIST_SECTIONS: &str = concat!("SELECT ", section_columns!(), " FROM sections ORDER BY id");

pub const GET_SECTION: &str = concat!("SELECT ", section_columns!(), " FROM sections WHERE id = $1");

pub const INSERT_SECTION: &str = concat!(
    "INSERT INTO sections (title, title2, text, element1, element2, element3, element4, \
     image1, image2, image3, image4, image5, image6, image7) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING ",
    section_columns!()
);

pub const UPDATE_SECTION: &str = concat!(
    "UPDATE sections SET title = $1, title2 = $2, text = $3, element1 = $4, element2 = $5, \
     element3 = $6, element4 = $7, image1 = $8, image2 = $9, image3 = $10, image4 = $11, \
     image5 = $12, image6 = $13, image7 = $14 WHERE id = $15 RETURNING ",
    section_columns!()
);

pub const DELETE_SECTION: &str = "DELETE FROM sections WHERE id = $1";
// endregion: --- Sections

// region:    --- Categories
pub const LIST_CATEGORIES: &str = "SELECT id, name FROM categories ORDER BY id";

pub const INSERT_CATEGORY: &str = "INSERT INTO categories (name) VALUES ($1) RETURNING id, name";
// endregion: --- Categories

// region:    --- Gallery Items
pub const LIST_GALLERY_ITEMS: &str = concat!(
    gallery_item_select!(),
    "GROUP BY g.id ORDER BY g.id LIMIT $1 OFFSET $2"
);

pub const COUNT_GALLERY_ITEMS: &str = "SELECT COUNT(*) FROM gallery_items";

pub const GET_GALLERY_ITEM: &str = concat!(gallery_item_select!(), "WHERE g.id = $1 GROUP BY g.id");

pub const INSERT_GALLERY_ITEM: &str = r#"
    INSERT INTO gallery_items (title, artist, description, image)
    VALUES ($1, $2, $3, $4)
    RETURNING id
"#;

/// 전달된 필드만 갱신
pub const UPDATE_GALLERY_ITEM: &str = r#"
    UPDATE gallery_items
    SET title = COALESCE($1, title),
        artist = COALESCE($2, artist),
        description = COALESCE($3, description),
        image = COALESCE($4, image)
    WHERE id = $5
    RETURNING id
"#;

pub const CLEAR_GALLERY_ITEM_CATEGORIES: &str =
    "DELETE FROM gallery_item_categories WHERE gallery_item_id = $1";

/// 이름이 일치하는 카테고리만 연결 (없는 이름은 무시)
pub const LINK_GALLERY_ITEM_CATEGORIES: &str = r#"
    INSERT INTO gallery_item_categories (gallery_item_id, category_id)
    SELECT $1, id FROM categories WHERE TRIM(name) = ANY($2)
    ON CONFLICT DO NOTHING
"#;

pub const DELETE_GALLERY_ITEM: &str = "DELETE FROM gallery_items WHERE id = $1";
// endregion: --- Gallery Items

// region:    --- Exhibitions
pub const LIST_EXHIBITIONS: &str = concat!(
    "SELECT ",
    exhibition_columns!(),
    " FROM exhibitions ORDER BY start_date DESC, id"
);

pub const GET_EXHIBITION: &str = concat!("SELECT ", exhibition_columns!(), " FROM exhibitions WHERE id = $1");

pub const INSERT_EXHIBITION: &str = concat!(
    "INSERT INTO exhibitions (title, title2, title3, description, start_date, end_date, link, \
     image, element1, element2, element3, element4) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING ",
    exhibition_columns!()
);

pub const UPDATE_EXHIBITION: &str = concat!(
    "UPDATE exhibitions SET title = $1, title2 = $2, title3 = $3, description = $4, \
     start_date = $5, end_date = $6, link = $7, image = $8, element1 = $9, element2 = $10, \
     element3 = $11, element4 = $12 WHERE id = $13 RETURNING ",
    exhibition_columns!()
);

pub const DELETE_EXHIBITION: &str = "DELETE FROM exhibitions WHERE id = $1";
// endregion: --- Exhibitions

// region:    --- FAQ
pub const LIST_FAQS: &str = "SELECT id, question, answer FROM faqs ORDER BY id";

pub const GET_FAQ: &str = "SELECT id, question, answer FROM faqs WHERE id = $1";

pub const INSERT_FAQ: &str =
    "INSERT INTO faqs (question, answer) VALUES ($1, $2) RETURNING id, question, answer";

pub const UPDATE_FAQ: &str = r#"
    UPDATE faqs
    SET question = COALESCE($1, question),
        answer = COALESCE($2, answer)
    WHERE id = $3
    RETURNING id, question, answer
"#;

pub const DELETE_FAQ: &str = "DELETE FROM faqs WHERE id = $1";
// endregion: --- FAQ
