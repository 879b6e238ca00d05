use serde::Deserialize;

/// Which UI components to generate.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Form,
    Table,
    #[default]
    Both,
}

impl ComponentKind {
    pub fn includes_form(self) -> bool {
        matches!(self, Self::Form | Self::Both)
    }

    pub fn includes_table(self) -> bool {
        matches!(self, Self::Table | Self::Both)
    }
}

/// Language of labels, messages and prompts.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
}

impl Language {
    /// BCP 47 locale used for date formatting in generated components
    pub fn locale(self) -> &'static str {
        match self {
            Self::De => "de-DE",
            Self::En => "en-US",
        }
    }

    /// Picks the German or English variant
    pub fn pick<'a>(self, de: &'a str, en: &'a str) -> &'a str {
        match self {
            Self::De => de,
            Self::En => en,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Styling {
    MaterialUi,
    Tailwind,
    #[default]
    Both,
}

impl Styling {
    pub fn uses_tailwind(self) -> bool {
        matches!(self, Self::Tailwind | Self::Both)
    }
}

/// Task section used for generation prompts.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptTemplate {
    Form,
    Table,
    #[default]
    Crud,
}

impl PromptTemplate {
    /// Directory the generated component is expected in
    pub fn component_dir(self) -> &'static str {
        match self {
            Self::Form => "forms",
            Self::Table => "tables",
            Self::Crud => "pages",
        }
    }

    pub fn component_suffix(self) -> &'static str {
        match self {
            Self::Form => "Form",
            Self::Table => "Table",
            Self::Crud => "Page",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationOptions {
    pub component: ComponentKind,
    pub language: Language,
    pub styling: Styling,
    pub include_tests: bool,
    pub include_documentation: bool,
    pub prompt_template: PromptTemplate,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(mut self, component: ComponentKind) -> Self {
        self.component = component;
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn styling(mut self, styling: Styling) -> Self {
        self.styling = styling;
        self
    }

    pub fn with_tests(mut self) -> Self {
        self.include_tests = true;
        self
    }

    pub fn with_documentation(mut self) -> Self {
        self.include_documentation = true;
        self
    }

    pub fn prompt_template(mut self, template: PromptTemplate) -> Self {
        self.prompt_template = template;
        self
    }
}
