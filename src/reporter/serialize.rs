pub mod mime_type {
    use mime::Mime;
    use serde::Serializer;

    pub fn serialize<S>(mime: &Option<Mime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match mime {
            Some(mime) => serializer.serialize_str(mime.as_ref()),
            None => serializer.serialize_none(),
        }
    }
}

pub mod content {
    use crate::reporter::model::Content;
    use serde::Serializer;

    /// Text goes out verbatim, binary data as base64.
    pub fn serialize<S>(content: &Content, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match content {
            Content::Text(text) => serializer.serialize_str(text),
            Content::Bytes(bytes) => serializer.serialize_str(&base64::encode(bytes)),
        }
    }
}

pub mod kind {
    use crate::reporter::model::AttachmentKind;
    use serde::Serializer;

    pub fn serialize<S>(kind: &AttachmentKind, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(kind.tag())
    }
}
