/// How the loader treats elements it does not model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownElements {
    /// Skip the element and its subtree with a warning.
    #[default]
    Ignore,
    /// Fail with `MalformedDocument`.
    Reject,
}

/// Loader configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LoadOptions {
    #[serde(default)]
    pub unknown_elements: UnknownElements,
    /// Push inheritable presentation attributes of `<g>` elements down to their shapes.
    #[serde(default = "default_inherit_presentation")]
    pub inherit_presentation: bool,
}

fn default_inherit_presentation() -> bool {
    true
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            unknown_elements: UnknownElements::default(),
            inherit_presentation: default_inherit_presentation(),
        }
    }
}
