pub mod reply;

pub use reply::{
    build_sales_prompt, build_sales_request, parse_sales_reply, sales_reply, SalesError,
    SALES_HISTORY_WINDOW,
};
