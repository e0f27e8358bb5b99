use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid point id '{value}' in list '{list}'. Expected comma-separated non-negative integers (e.g. '3,17,80').")]
    InvalidPointId { value: String, list: String },

    #[error("Empty point id list.")]
    EmptyList,
}

/// Parses a comma-separated list of point ids, tolerating whitespace around
/// the separators.
pub fn parse_point_list(input: &str) -> Result<Vec<u32>, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyList);
    }
    trimmed
        .split(',')
        .map(|field| {
            field
                .trim()
                .parse::<u32>()
                .map_err(|_| ParseError::InvalidPointId {
                    value: field.trim().to_string(),
                    list: input.to_string(),
                })
        })
        .collect()
}
