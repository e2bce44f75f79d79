use strum::EnumVariantNames;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ContextSourceName {
    File,
    None,
}

impl ContextSourceName {
    pub fn parse(text: &str) -> Option<ContextSourceName> {
        match text {
            "file" => return Some(ContextSourceName::File),
            "none" => return Some(ContextSourceName::None),
            _ => return None,
        }
    }
}
