mod page_table;
mod tests;
mod trace;
