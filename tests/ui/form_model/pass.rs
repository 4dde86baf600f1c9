use staffgate::form::{FieldLens, FormModel};

#[derive(Clone, Default, staffgate::form::FormModel)]
struct ContactForm {
    email: String,
    phone_number: String,
}

fn main() {
    let fields = ContactForm::fields();
    let lens = fields.phone_number();
    let mut model = ContactForm {
        email: "ada@example.com".to_string(),
        phone_number: String::new(),
    };
    lens.set(&mut model, "9876543210".to_string());
    assert_eq!(lens.key().as_str(), "phone_number");
    assert_eq!(lens.get(&model), "9876543210");
    assert_eq!(model.value(fields.email().key()), Some("ada@example.com"));
    assert_eq!(ContactForm::KEYS.len(), 2);
}
