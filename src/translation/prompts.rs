/*!
 * Prompt template for cell translation.
 */

use crate::language_utils::prompt_language_name;

/// User prompt sent for every cell
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// Default prompt: translate, keep the format, return only the result.
    pub const CELL_TRANSLATOR: &'static str = "Please translate the following text to {target_language}, keep the original format, only return the translation result:\n{text}";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default cell translator template.
    pub fn cell_translator() -> Self {
        Self::new(Self::CELL_TRANSLATOR)
    }

    /// Render the template for one cell.
    ///
    /// ISO codes such as `fr` or `deu` are expanded to language names. The
    /// language is substituted before the text so placeholders inside cell
    /// content stay untouched.
    pub fn render(&self, text: &str, target_language: &str) -> String {
        self.template
            .replace("{target_language}", &prompt_language_name(target_language))
            .replace("{text}", text)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::cell_translator()
    }
}
