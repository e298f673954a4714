use serde::Serialize;

use crate::content::SiteContent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionVisibility {
    pub id: &'static str,
    pub label: &'static str,
    pub has_data: bool,
}

impl SectionVisibility {
    fn new(id: &'static str, label: &'static str, has_data: bool) -> Self {
        Self {
            id,
            label,
            has_data,
        }
    }
}

/// Navigation entries in page order, flagged by whether they have anything
/// to show. Hero and contact are static and always present.
pub fn section_visibility(content: &SiteContent) -> Vec<SectionVisibility> {
    vec![
        SectionVisibility::new("hero", "Home", true),
        SectionVisibility::new("services", "Services", !content.services.is_empty()),
        SectionVisibility::new("products", "Products", !content.products.is_empty()),
        SectionVisibility::new("gallery", "Gallery", !content.gallery.is_empty()),
        SectionVisibility::new(
            "testimonials",
            "Testimonials",
            content.testimonials.iter().any(|t| t.is_published()),
        ),
        SectionVisibility::new("contact", "Contact", true),
    ]
}

pub fn visible_sections(content: &SiteContent) -> Vec<SectionVisibility> {
    section_visibility(content)
        .into_iter()
        .filter(|section| section.has_data)
        .collect()
}
