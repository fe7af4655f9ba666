//! Construction of pre-configured `genpdf::Document` instances.

use genpdf::{self, PageDecorator, Size};

use crate::error::{Error, Result};
use crate::fonts;
use crate::style::pt_to_mm;

/// Builder for `genpdf::Document` instances with the crate defaults.
#[derive(Default)]
pub struct DocumentBuilder {
    title: Option<String>,
    paper_size: Option<Size>,
    decorator: Option<Box<dyn PageDecorator>>,
}

impl DocumentBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the paper size used for every page.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the paper size from a width and height in PDF points.
    pub fn with_paper_size_pt(self, width: f64, height: f64) -> Self {
        self.with_paper_size(Size::new(pt_to_mm(width), pt_to_mm(height)))
    }

    /// Sets the page decorator invoked before each page is filled.
    pub fn with_decorator<D: PageDecorator + 'static>(mut self, decorator: D) -> Self {
        self.decorator = Some(Box::new(decorator));
        self
    }

    /// Builds a fully configured `genpdf::Document` instance.
    pub fn build(self) -> Result<genpdf::Document> {
        let font_family = fonts::default_font_family().map_err(Error::FontLoad)?;
        let mut document = genpdf::Document::new(font_family);
        document.set_minimal_conformance();

        if let Some(title) = self.title {
            document.set_title(title);
        }
        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }
        if let Some(decorator) = self.decorator {
            document.set_page_decorator(BoxedDecorator(decorator));
        }

        Ok(document)
    }
}

struct BoxedDecorator(Box<dyn PageDecorator>);

impl PageDecorator for BoxedDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        area: genpdf::render::Area<'a>,
        style: genpdf::style::Style,
    ) -> std::result::Result<genpdf::render::Area<'a>, genpdf::error::Error> {
        self.0.decorate_page(context, area, style)
    }
}
