pub mod board_member;
pub mod org_domain;
pub mod page_text;
