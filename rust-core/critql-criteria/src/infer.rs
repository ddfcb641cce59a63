// SPDX-License-Identifier: PMPL-1.0-or-later
//! Range value type inference.

use crate::value::CriteriaValue;

pub const XS_DATE_TIME: &str = "xs:dateTime";
pub const XS_DATE: &str = "xs:date";
pub const XS_STRING: &str = "xs:string";
pub const XS_INT: &str = "xs:int";
pub const XS_LONG: &str = "xs:long";
pub const XS_FLOAT: &str = "xs:float";
pub const XS_DOUBLE: &str = "xs:double";
pub const XS_BOOLEAN: &str = "xs:boolean";

/// Backend type naming for non-temporal range values.
pub trait TypeConversionProvider: Send + Sync {
    fn type_token_of(&self, value: &CriteriaValue) -> String;
}

/// XML Schema type tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct XsTypeConverter;

impl TypeConversionProvider for XsTypeConverter {
    fn type_token_of(&self, value: &CriteriaValue) -> String {
        let token = match value {
            CriteriaValue::Int(_) => XS_INT,
            CriteriaValue::Long(_) => XS_LONG,
            CriteriaValue::Float(_) => XS_FLOAT,
            CriteriaValue::Double(_) => XS_DOUBLE,
            CriteriaValue::Boolean(_) => XS_BOOLEAN,
            CriteriaValue::DateTime(_) => XS_DATE_TIME,
            CriteriaValue::Date(_) => XS_DATE,
            CriteriaValue::Text(_) | CriteriaValue::TextList(_) | CriteriaValue::Other(_) => {
                XS_STRING
            }
        };
        token.to_string()
    }
}

/// Type token for a range predicate.
///
/// A non-blank explicit token wins. Temporal values are date-times; anything
/// else is named by `provider`.
pub fn infer_type(
    explicit: Option<&str>,
    value: &CriteriaValue,
    provider: &dyn TypeConversionProvider,
) -> String {
    match explicit {
        Some(token) if !token.trim().is_empty() => token.to_string(),
        _ if value.is_temporal() => XS_DATE_TIME.to_string(),
        _ => provider.type_token_of(value),
    }
}
