use crate::error::ApiError;

/// Unwraps a required body field. Call in declared field order so the first
/// missing field is the one reported.
pub fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or(ApiError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_value_passes_through() {
        assert_eq!(required("job_name", Some("x")).unwrap(), "x");
    }

    #[test]
    fn first_missing_field_is_reported() {
        let job_name: Option<String> = Some("job".into());
        let company_name: Option<String> = None;
        let status: Option<String> = None;

        let err = (|| -> Result<(), ApiError> {
            required("job_name", job_name)?;
            required("company_name", company_name)?;
            required("status", status)?;
            Ok(())
        })()
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing 'company_name' in request body");
    }
}
