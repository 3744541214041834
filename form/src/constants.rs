pub const INVALID_FORM_MESSAGE: &str = "Unvalid Form Data";
pub const UNPARSABLE_FORM_MESSAGE: &str = "Unparsable Form Data";
pub const INVALID_SCHEMA_MESSAGE: &str = "Invalid Form Schema";

/// Keys accepted by the rule mini-language.
pub const RULE_AS: &str = "as";
pub const RULE_REQUIRED: &str = "required";
pub const RULE_MIN: &str = "min";
pub const RULE_EMAIL: &str = "email";
pub const RULE_COMMA: &str = "comma";

pub const RULE_SEPARATOR: char = ',';
pub const RULE_KEY_SEPARATOR: char = ':';
pub const LIST_SEPARATOR: char = ',';
