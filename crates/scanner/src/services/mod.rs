pub mod alert_format;
pub mod scan_service;
pub mod startup;
pub mod telegram_service;

#[cfg(test)]
pub(crate) mod test_support;
