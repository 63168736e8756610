use infrascript::ast::{ParamValue, Statement, Template};
use infrascript::executor::{Callback, TemplateActions};
use infrascript::syntax::TemplateParser;

fn callbacks(text: &str) -> Vec<Callback> {
    let mut parser = TemplateParser::new(text);
    let parsed = parser.parse().unwrap();
    let mut calls = Vec::new();
    parsed.execute(&mut calls);
    calls
}

fn text(s: &str) -> String {
    s.to_string()
}

#[test]
fn declaration_and_reference_replay_in_order() {
    let calls = callbacks(
        "vpcid = create vpc cidr=10.0.0.0/16\ncreate subnet vpc=$vpcid cidr=10.0.0.1/24\n",
    );
    assert_eq!(
        calls,
        vec![
            Callback::DeclarationIdentifier(text("vpcid")),
            Callback::Action(text("create")),
            Callback::Entity(text("vpc")),
            Callback::ParamKey(text("cidr")),
            Callback::CidrValue(text("10.0.0.0/16")),
            Callback::StatementEnd,
            Callback::Action(text("create")),
            Callback::Entity(text("subnet")),
            Callback::ParamKey(text("vpc")),
            Callback::RefValue(text("vpcid")),
            Callback::ParamKey(text("cidr")),
            Callback::CidrValue(text("10.0.0.1/24")),
            Callback::StatementEnd,
        ]
    );
}

#[test]
fn hash_comments_do_not_end_a_statement() {
    let calls = callbacks("# comment\ncreate vpc\n");
    let ends = calls.iter().filter(|c| **c == Callback::StatementEnd).count();
    assert_eq!(ends, 1);
    assert_eq!(calls[0], Callback::Action(text("create")));
}

#[test]
fn slash_comments_end_a_statement() {
    let calls = callbacks("// comment\ncreate vpc\n");
    assert_eq!(
        calls,
        vec![
            Callback::StatementEnd,
            Callback::Action(text("create")),
            Callback::Entity(text("vpc")),
            Callback::StatementEnd,
        ]
    );
}

#[test]
fn comment_only_template_parses() {
    assert!(callbacks("# nothing here").is_empty());
    assert_eq!(callbacks("// nothing here"), vec![Callback::StatementEnd]);
}

#[derive(Default)]
struct Counter {
    actions: usize,
    values: usize,
}

impl TemplateActions for Counter {
    fn on_action(&mut self, _action: &str) {
        self.actions += 1;
    }

    fn on_generic_value(&mut self, _value: &str) {
        self.values += 1;
    }
}

#[test]
fn partial_receivers_only_see_what_they_override() {
    let mut parser = TemplateParser::new("create tag key=Name value=web\ndelete tag key=Name\n");
    let parsed = parser.parse().unwrap();
    let mut counter = Counter::default();
    parsed.execute(&mut counter);
    assert_eq!((counter.actions, counter.values), (2, 3));
}

#[test]
fn builder_assembles_the_template() {
    let template = Template::parse(
        "// network\nvpcid = create vpc cidr=10.0.0.0/16\n# instances\ncreate instance subnet=$sub count=3 ip=10.0.0.4 name={name}\n",
    )
    .unwrap();

    assert_eq!(template.statements.len(), 2);
    match &template.statements[0] {
        Statement::Declaration { identifier, command } => {
            assert_eq!(identifier, "vpcid");
            assert_eq!(command.entity, "vpc");
            assert_eq!(command.params["cidr"], ParamValue::Cidr(text("10.0.0.0/16")));
        }
        other => panic!("expected a declaration, got {other:?}"),
    }

    let command = template.statements[1].command();
    let keys: Vec<&str> = command.params.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["subnet", "count", "ip", "name"]);
    assert_eq!(command.params["count"], ParamValue::Int(3));
    assert_eq!(command.params["ip"], ParamValue::Ip(text("10.0.0.4")));
    assert_eq!(command.params["name"], ParamValue::Hole(text("name")));
}
