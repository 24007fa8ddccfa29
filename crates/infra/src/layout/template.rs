//! Local component renderer.
//!
//! Builds the component tree in-process from fixed templates. Used when no
//! remote layout service is configured.

use async_trait::async_trait;
use serde_json::{Value, json};

use storefront_catalog::{Component, HeroLayout, ProductCard};

use super::{LayoutGenerator, LayoutResult};

#[derive(Debug, Clone, Default)]
pub struct TemplateLayoutGenerator;

impl TemplateLayoutGenerator {
    pub fn new() -> Self {
        Self
    }
}

fn node(kind: &str, props: Value, children: Vec<Value>) -> Value {
    json!({
        "type": kind,
        "props": props,
        "children": children,
    })
}

fn text(kind: &str, content: &Value) -> Value {
    node(kind, json!({ "text": content }), vec![])
}

/// Optional hero values are embedded as received.
pub fn render_hero(hero: &HeroLayout) -> Component {
    let mut children = vec![text("Heading", &hero.heading), text("Subheading", &hero.subhead)];
    if let Some(image) = &hero.image {
        children.push(node("Image", json!({ "source": image }), vec![]));
    }
    if let Some(cta) = &hero.cta {
        children.push(node("CallToAction", cta.clone(), vec![]));
    }

    Component::new(node(
        "HeroSection",
        json!({ "style": hero.style.clone().unwrap_or(Value::Null) }),
        children,
    ))
}

pub fn render_card(card: &ProductCard) -> Component {
    Component::new(node(
        "ProductCard",
        json!({ "category": card.category }),
        vec![
            text("Title", &card.name),
            text("Description", &card.description),
            node("Price", json!({ "amount": card.price }), vec![]),
        ],
    ))
}

#[async_trait]
impl LayoutGenerator for TemplateLayoutGenerator {
    async fn render_hero(&self, hero: &HeroLayout) -> LayoutResult<Component> {
        Ok(render_hero(hero))
    }

    async fn render_card(&self, card: &ProductCard) -> LayoutResult<Component> {
        Ok(render_card(card))
    }
}
