use base64::{Engine as _, engine::general_purpose::STANDARD};

/// One ordered segment of a model request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Image { mime_type: String, data: Vec<u8> },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn image(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Image {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image { .. } => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }

    /// `data:` URL form used by OpenAI-compatible endpoints.
    pub fn data_url(&self) -> Option<String> {
        match self {
            Self::Image { mime_type, data } => {
                Some(format!("data:{};base64,{}", mime_type, STANDARD.encode(data)))
            }
            Self::Text(_) => None,
        }
    }
}
