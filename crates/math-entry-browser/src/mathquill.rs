//! MathQuill bindings.
//!
//! Binds the global `MathQuill.getInterface(2)` object and implements the
//! core `MathBackend` / `MathField` / `EmbedRegistry` traits on top of it.
//! MathQuill must be loaded before the wasm module starts; its absence is not
//! checked at runtime.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use math_entry_core::{
    EmbedRegistry, EmbedSymbol, FieldConfig, MathBackend, MathEntryError, MathField,
    register_gap_embed,
};

/// MathQuill interface version the bindings target.
const INTERFACE_VERSION: u32 = 2;

#[wasm_bindgen]
extern "C" {
    /// The object returned by `MathQuill.getInterface(2)`.
    #[derive(Debug, Clone)]
    pub type MqInterface;

    #[wasm_bindgen(js_namespace = MathQuill, js_name = getInterface)]
    fn get_interface(version: u32) -> MqInterface;

    #[wasm_bindgen(method, catch, js_name = MathField)]
    fn math_field(
        this: &MqInterface,
        element: &HtmlElement,
        config: &Object,
    ) -> Result<MqField, JsValue>;

    #[wasm_bindgen(method, catch, js_name = StaticMath)]
    fn static_math(this: &MqInterface, element: &HtmlElement) -> Result<MqField, JsValue>;

    #[wasm_bindgen(method, catch, js_name = registerEmbed)]
    fn register_embed(this: &MqInterface, name: &str, factory: &Function) -> Result<(), JsValue>;

    /// A MathQuill field instance (editable, static, or inner).
    #[derive(Debug, Clone)]
    pub type MqField;

    #[wasm_bindgen(method, js_name = latex)]
    fn get_latex(this: &MqField) -> String;

    #[wasm_bindgen(method, js_name = latex)]
    fn set_latex(this: &MqField, latex: &str);

    #[wasm_bindgen(method)]
    fn cmd(this: &MqField, latex: &str);

    #[wasm_bindgen(method)]
    fn write(this: &MqField, latex: &str);

    #[wasm_bindgen(method)]
    fn focus(this: &MqField);

    #[wasm_bindgen(method)]
    fn config(this: &MqField, config: &Object);

    #[wasm_bindgen(method)]
    fn revert(this: &MqField);

    #[wasm_bindgen(method, getter, js_name = innerFields)]
    fn inner_fields(this: &MqField) -> JsValue;
}

type EditClosure = Closure<dyn Fn(MqField)>;

/// Build the MathQuill config object for `config`.
///
/// The returned closure backs `handlers.edit` and must outlive the field's
/// use of that config.
fn mq_config(config: &FieldConfig) -> Result<(Object, Option<EditClosure>), JsValue> {
    let object = Object::new();
    Reflect::set(
        &object,
        &JsValue::from_str("spaceBehavesLikeTab"),
        &JsValue::from_bool(config.space_behaves_like_tab),
    )?;

    let handlers = Object::new();
    let edit = config.on_edit.clone().map(|on_edit| {
        EditClosure::new(move |field: MqField| on_edit(&field.get_latex()))
    });
    if let Some(edit) = &edit {
        Reflect::set(&handlers, &JsValue::from_str("edit"), edit.as_ref())?;
    }
    Reflect::set(&object, &JsValue::from_str("handlers"), &handlers)?;

    Ok((object, edit))
}

fn backend_error(context: &str, e: JsValue) -> MathEntryError {
    MathEntryError::Backend(format!("{context}: {e:?}"))
}

/// Handle to a MathQuill field.
#[derive(Debug, Clone)]
pub struct MathQuillField {
    raw: MqField,
    edit_handler: Rc<RefCell<Option<EditClosure>>>,
}

impl MathQuillField {
    fn new(raw: MqField, edit_handler: Option<EditClosure>) -> Self {
        Self {
            raw,
            edit_handler: Rc::new(RefCell::new(edit_handler)),
        }
    }

    pub fn raw(&self) -> &MqField {
        &self.raw
    }
}

impl MathField for MathQuillField {
    fn latex(&self) -> String {
        self.raw.get_latex()
    }

    fn set_latex(&self, latex: &str) {
        self.raw.set_latex(latex);
    }

    fn cmd(&self, latex: &str) {
        self.raw.cmd(latex);
    }

    fn write(&self, latex: &str) {
        self.raw.write(latex);
    }

    fn focus(&self) {
        self.raw.focus();
    }

    fn reconfigure(&self, config: &FieldConfig) {
        let (object, edit) = match mq_config(config) {
            Ok(built) => built,
            Err(e) => {
                tracing::warn!(error = ?e, "failed to build field config, keeping the old one");
                return;
            }
        };
        self.raw.config(&object);
        // The previous handler is no longer referenced once config() returns.
        *self.edit_handler.borrow_mut() = edit;
    }

    fn inner_fields(&self) -> Vec<Self> {
        let fields = self.raw.inner_fields();
        if !Array::is_array(&fields) {
            return Vec::new();
        }
        Array::from(&fields)
            .iter()
            .map(|field| MathQuillField::new(field.unchecked_into(), None))
            .collect()
    }

    fn revert(&self) {
        self.raw.revert();
        self.edit_handler.borrow_mut().take();
    }
}

/// The MathQuill interface.
#[derive(Debug, Clone)]
pub struct MathQuill {
    interface: MqInterface,
}

impl MathQuill {
    pub fn interface() -> Self {
        Self {
            interface: get_interface(INTERFACE_VERSION),
        }
    }
}

impl EmbedRegistry for MathQuill {
    fn register_embed(&self, name: &str, symbol: &EmbedSymbol) -> Result<(), MathEntryError> {
        let descriptor = embed_descriptor(symbol)
            .map_err(|e| backend_error("building embed descriptor failed", e))?;
        let factory = Closure::<dyn Fn() -> JsValue>::new(move || descriptor.clone());
        let result = self
            .interface
            .register_embed(name, factory.as_ref().unchecked_ref());
        // Embeds stay registered for the lifetime of the page.
        factory.forget();
        result.map_err(|e| backend_error(&format!("registerEmbed({name}) failed"), e))
    }
}

/// The `{ htmlString, text(), latex() }` object MathQuill expects from an
/// embed factory.
fn embed_descriptor(symbol: &EmbedSymbol) -> Result<JsValue, JsValue> {
    let descriptor = Object::new();
    let text = symbol.text;
    let latex = symbol.latex;

    Reflect::set(
        &descriptor,
        &JsValue::from_str("htmlString"),
        &JsValue::from_str(symbol.html),
    )?;
    Reflect::set(
        &descriptor,
        &JsValue::from_str("text"),
        &Closure::<dyn Fn() -> String>::new(move || text.to_string()).into_js_value(),
    )?;
    Reflect::set(
        &descriptor,
        &JsValue::from_str("latex"),
        &Closure::<dyn Fn() -> String>::new(move || latex.to_string()).into_js_value(),
    )?;

    Ok(descriptor.into())
}

/// Register the gap embed with MathQuill. Safe to call more than once.
pub fn install_gap_embed() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        if let Err(e) = register_gap_embed(&MathQuill::interface()) {
            tracing::error!(error = %e, "failed to register gap embed");
        }
    });
}

/// MathQuill bound to one interaction's input element.
#[derive(Debug, Clone)]
pub struct MathQuillBackend {
    mathquill: MathQuill,
    element: HtmlElement,
}

impl MathQuillBackend {
    pub fn new(element: HtmlElement) -> Self {
        Self {
            mathquill: MathQuill::interface(),
            element,
        }
    }
}

impl MathBackend for MathQuillBackend {
    type Field = MathQuillField;

    fn create_editable(&mut self, config: &FieldConfig) -> Result<MathQuillField, MathEntryError> {
        let (object, edit) =
            mq_config(config).map_err(|e| backend_error("building field config failed", e))?;
        let raw = self
            .mathquill
            .interface
            .math_field(&self.element, &object)
            .map_err(|e| backend_error("MathField failed", e))?;
        Ok(MathQuillField::new(raw, edit))
    }

    fn create_static(&mut self, latex: &str) -> Result<MathQuillField, MathEntryError> {
        self.element.set_text_content(Some(latex));
        let raw = self
            .mathquill
            .interface
            .static_math(&self.element)
            .map_err(|e| backend_error("StaticMath failed", e))?;
        Ok(MathQuillField::new(raw, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_entry_core::GAP_EMBED;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn get(target: &JsValue, key: &str) -> JsValue {
        Reflect::get(target, &JsValue::from_str(key)).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_embed_descriptor_shape() {
        let descriptor = embed_descriptor(&GAP_EMBED).unwrap();
        assert_eq!(
            get(&descriptor, "htmlString").as_string().as_deref(),
            Some(GAP_EMBED.html)
        );

        let latex: Function = get(&descriptor, "latex").unchecked_into();
        assert_eq!(
            latex.call0(&JsValue::NULL).unwrap().as_string().as_deref(),
            Some(GAP_EMBED.latex)
        );
        let text: Function = get(&descriptor, "text").unchecked_into();
        assert_eq!(
            text.call0(&JsValue::NULL).unwrap().as_string().as_deref(),
            Some(GAP_EMBED.text)
        );
    }

    #[wasm_bindgen_test]
    fn test_field_config_object() {
        let (object, edit) = mq_config(&FieldConfig::default()).unwrap();
        assert_eq!(get(&object, "spaceBehavesLikeTab").as_bool(), Some(false));
        assert!(get(&get(&object, "handlers"), "edit").is_undefined());
        assert!(edit.is_none());

        let config = FieldConfig {
            space_behaves_like_tab: true,
            on_edit: Some(Rc::new(|_: &str| {})),
        };
        let (object, edit) = mq_config(&config).unwrap();
        assert_eq!(get(&object, "spaceBehavesLikeTab").as_bool(), Some(true));
        assert!(get(&get(&object, "handlers"), "edit").is_function());
        assert!(edit.is_some());
    }
}
