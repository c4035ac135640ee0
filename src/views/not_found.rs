// ============================================================================
// NOT FOUND VIEW
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::ElementBuilder;
use crate::state::Page;

pub fn render_not_found() -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("page not-found-page")
        .child(ElementBuilder::new("h1")?.class("page-title").text("404").build())?
        .child(ElementBuilder::new("p")?.text("Oops! Page not found").build())?
        .child(
            ElementBuilder::new("a")?
                .class("nav-link")
                .attr("href", &format!("#{}", Page::Dashboard.path()))?
                .text("Return to Home")
                .build(),
        )?
        .build())
}
