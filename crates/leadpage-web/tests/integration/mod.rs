mod lead_pages;
mod not_found;
