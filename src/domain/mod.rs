pub mod detail_page;
pub mod file_name;
pub mod html_tag;
pub mod metadata;
pub mod result_link;
pub mod search_prompt;
