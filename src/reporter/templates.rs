use kstring::KString;
use liquid::model::Value;
use liquid::{Object, Parser};
use std::collections::HashMap;
use std::iter::{once, FromIterator};
use std::sync::Arc;

pub const TEAM_ENGINE_ERROR: &str = "TR.teamEngineError";
pub const ENGLISH: &str = "en";
pub const GERMAN: &str = "de";

/// Translation templates for messages reported against result items.
///
/// Templates are liquid markup with the message text bound to `error`.
#[derive(derivative::Derivative)]
#[derivative(Debug)]
pub struct TemplateBundle {
    templates: HashMap<(String, String), String>,
    #[derivative(Debug = "ignore")]
    parser: Arc<Parser>,
}

impl TemplateBundle {
    pub fn empty() -> Result<Self, String> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Self {
            templates: HashMap::new(),
            parser: Arc::new(parser),
        })
    }

    /// The bundle shipped with the driver.
    pub fn team_engine() -> Result<Self, String> {
        let mut bundle = Self::empty()?;
        bundle.insert(
            TEAM_ENGINE_ERROR,
            ENGLISH,
            "OGC TEAM Engine reported a failed test: {{error}}",
        );
        bundle.insert(
            TEAM_ENGINE_ERROR,
            GERMAN,
            "Die OGC TEAM Engine hat folgenden Fehler gemeldet: {{error}}",
        );
        Ok(bundle)
    }

    pub fn insert(&mut self, key: &str, language: &str, template: &str) {
        self.templates
            .insert((key.to_owned(), language.to_owned()), template.to_owned());
    }

    /// Renders `text` through the template registered for `key`, falling back
    /// to the raw text when there is none or it cannot be rendered.
    pub fn render(&self, key: &str, language: &str, text: &str) -> String {
        let source = match self.templates.get(&(key.to_owned(), language.to_owned())) {
            Some(source) => source,
            None => return text.to_owned(),
        };
        let globals = Object::from_iter(once((
            KString::from_static("error"),
            Value::scalar(text.to_owned()),
        )));
        let rendered = self
            .parser
            .parse(source)
            .and_then(|template| template.render(&globals));
        match rendered {
            Ok(rendered) => rendered,
            Err(err) => {
                warn!("Cannot render template {}: {}", key, err);
                text.to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_english_template() {
        let bundle = TemplateBundle::team_engine().unwrap();
        let message = bundle.render(TEAM_ENGINE_ERROR, ENGLISH, "feature count mismatch");

        assert_eq!(
            message,
            "OGC TEAM Engine reported a failed test: feature count mismatch"
        );
    }

    #[test]
    fn test_render_german_template() {
        let bundle = TemplateBundle::team_engine().unwrap();
        let message = bundle.render(TEAM_ENGINE_ERROR, GERMAN, "x");

        assert_eq!(message, "Die OGC TEAM Engine hat folgenden Fehler gemeldet: x");
    }

    #[test]
    fn test_unknown_key_falls_back_to_text() {
        let bundle = TemplateBundle::team_engine().unwrap();

        assert_eq!(bundle.render("TR.unknown", ENGLISH, "raw"), "raw");
    }

    #[test]
    fn test_template_markup_in_text_is_not_interpreted() {
        let bundle = TemplateBundle::team_engine().unwrap();
        let message = bundle.render(TEAM_ENGINE_ERROR, ENGLISH, "{{ nothing }}");

        assert!(message.ends_with("{{ nothing }}"));
    }
}
