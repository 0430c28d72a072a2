//! Canonical debug rendering of a [`super::Query`] (spec §6.4). Used for test
//! assertions and logging only — never parsed back by a production consumer.

use super::Query;

impl Query {
    pub fn render(&self) -> String {
        match self {
            Query::Select { name, args, child } => {
                let args_str = render_args(args);
                if child.is_empty_node() {
                    format!("{name}{args_str}")
                } else {
                    format!("{name}{args_str}{{ {} }}", child.render())
                }
            }
            Query::Group(children) => {
                let rendered: Vec<String> = children.iter().map(Query::render).collect();
                format!("{{ {} }}", rendered.join(", "))
            }
            Query::Unique(child) => format!("Unique({})", child.render()),
            Query::Filter(pred, child) => format!("Filter({}, {})", pred.render(), child.render()),
            Query::Component {
                mapping,
                join,
                child,
            } => format!("Component({}, {}, {})", mapping.0, join.render(), child.render()),
            Query::Effect { handler, child } => {
                format!("Effect({}, {})", handler.0, child.render())
            }
            Query::Introspect { schema, child } => {
                format!("Introspect({schema}, {})", child.render())
            }
            Query::Environment { env: _, child } => format!("Environment({})", child.render()),
            Query::Wrap { name, child } => format!("Wrap({name}, {})", child.render()),
            Query::Rename { name, child } => format!("<rename: {name} {}>", child.render()),
            Query::UntypedNarrow { type_name, child } => {
                format!("<untyped-narrow: {type_name} {}>", child.render())
            }
            Query::Narrow { subtype, child } => {
                format!("<narrow: {subtype} {}>", child.render())
            }
            Query::Skip { sense, cond, child } => {
                format!("Skip({sense}, {}, {})", render_cond(cond), child.render())
            }
            Query::Limit { n, child } => format!("Limit({n}, {})", child.render()),
            Query::Offset { n, child } => format!("Offset({n}, {})", child.render()),
            Query::OrderBy { selections, child } => {
                let rendered: Vec<String> = selections
                    .iter()
                    .map(|s| {
                        format!(
                            "{}{}",
                            s.term.render(),
                            if s.ascending { "" } else { " desc" }
                        )
                    })
                    .collect();
                format!("OrderBy([{}], {})", rendered.join(", "), child.render())
            }
            Query::Count { name, child } => format!("Count({name}, {})", child.render()),
            Query::TransformCursor { transform, child } => {
                format!("TransformCursor({}, {})", transform.0, child.render())
            }
            Query::Skipped => "Skipped".to_string(),
            Query::Empty => "Empty".to_string(),
        }
    }
}

fn render_args(args: &[crate::value::Binding]) -> String {
    if args.is_empty() {
        String::new()
    } else {
        let rendered: Vec<String> = args.iter().map(|b| b.render()).collect();
        format!("({})", rendered.join(", "))
    }
}

fn render_cond(cond: &super::SkipCondition) -> String {
    match cond {
        super::SkipCondition::Constant(b) => b.to_string(),
        super::SkipCondition::Variable(name) => format!("${name}"),
    }
}
