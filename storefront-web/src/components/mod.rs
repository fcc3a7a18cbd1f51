pub mod cart_summary;
pub mod category_block;
pub mod compact_categories;
pub mod product_card;
