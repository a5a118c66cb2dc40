/// 갤러리 소개 콘텐츠 (섹션, 카테고리, 작품, 전시, FAQ)
pub mod model;
pub mod queries;
pub mod store;
