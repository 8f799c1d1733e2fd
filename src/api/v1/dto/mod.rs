/*
 * Responsibility
 * - request/response DTO
 * - validate() による形式チェック (ValidatedJson / ValidatedForm から呼ばれる)
 */
pub mod auth;
pub mod posts;

pub trait Validate {
    fn validate(&self) -> Result<(), &'static str>;
}

/// Length in characters, not bytes.
pub(crate) fn char_len_within(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}
