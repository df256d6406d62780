use crate::data::dataset::{Example, Header};
use crate::trees::node::Node;
use std::fmt;

/// One root-to-leaf path of a multiway tree: attribute tests and the class at the leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    conditions: Vec<(String, String)>,
    class: String,
}

impl Rule {
    pub fn new(conditions: Vec<(String, String)>, class: &str) -> Self {
        Self {
            conditions,
            class: class.to_string(),
        }
    }

    /// `(attribute, value)` pairs from the root down.
    pub fn conditions(&self) -> &[(String, String)] {
        &self.conditions
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// `true` if the row satisfies every condition of the rule.
    ///
    /// A condition on a column the header does not have is never satisfied.
    pub fn matches(&self, example: &Example, header: &Header) -> bool {
        self.conditions
            .iter()
            .all(|(attribute, value)| example.get(header, attribute) == Some(value.as_str()))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (attribute, value)) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{} = {}", attribute, value)?;
        }
        if !self.conditions.is_empty() {
            write!(f, " ")?;
        }
        write!(f, "=> {}", self.class)
    }
}

/// Collects one rule per leaf, depth first, following branch order.
pub fn extract_rules(root: &Node) -> Vec<Rule> {
    let mut rules = Vec::with_capacity(root.leaf_count());
    let mut path = Vec::new();
    collect_rules(root, &mut path, &mut rules);
    rules
}

fn collect_rules(node: &Node, path: &mut Vec<(String, String)>, rules: &mut Vec<Rule>) {
    if node.is_leaf() {
        rules.push(Rule::new(path.clone(), node.label()));
        return;
    }
    for (value, child) in node.branches() {
        path.push((node.label().to_string(), value.to_string()));
        collect_rules(child, path, rules);
        path.pop();
    }
}

/// Class of the first rule, in extraction order, that the row satisfies.
pub fn classify<'a>(rules: &'a [Rule], example: &Example, header: &Header) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.matches(example, header))
        .map(Rule::class)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Header {
        Header::new(
            vec!["genre".into(), "company".into(), "revenue".into()],
            "revenue",
            &[],
        )
        .unwrap()
    }

    fn example(genre: &str, company: &str) -> Example {
        Example::new(vec![genre.into(), company.into(), String::new()])
    }

    fn tree() -> Node {
        let mut company = Node::split("company");
        company.add_branch("Disney", Node::leaf("3"));
        company.add_branch("Other", Node::leaf("1"));

        let mut root = Node::split("genre");
        root.add_branch("Action", company);
        root.add_branch("Drama", Node::leaf("0"));
        root
    }

    #[test]
    fn test_one_rule_per_leaf() {
        let root = tree();
        let rules = extract_rules(&root);
        assert_eq!(rules.len(), root.leaf_count());
        assert_eq!(
            rules.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec![
                "genre = Action AND company = Disney => 3",
                "genre = Action AND company = Other => 1",
                "genre = Drama => 0",
            ]
        );
    }

    #[test]
    fn test_leaf_root_gives_unconditional_rule() {
        let rules = extract_rules(&Node::leaf("2"));
        assert_eq!(rules, vec![Rule::new(Vec::new(), "2")]);
        assert_eq!(rules[0].to_string(), "=> 2");
        assert_eq!(classify(&rules, &example("Horror", "Other"), &header()), Some("2"));
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let root = tree();
        assert_eq!(extract_rules(&root), extract_rules(&root));
    }

    #[test]
    fn test_classify_first_match() {
        let rules = extract_rules(&tree());
        let header = header();
        assert_eq!(classify(&rules, &example("Action", "Disney"), &header), Some("3"));
        assert_eq!(classify(&rules, &example("Action", "Other"), &header), Some("1"));
        assert_eq!(classify(&rules, &example("Drama", "Disney"), &header), Some("0"));
    }

    #[test]
    fn test_classify_without_matching_rule() {
        let rules = extract_rules(&tree());
        let header = header();
        assert_eq!(classify(&rules, &example("Comedy", "Other"), &header), None);
        assert_eq!(classify(&rules, &example("Action", "Empty"), &header), None);
    }

    #[test]
    fn test_condition_on_unknown_column_never_matches() {
        let rule = Rule::new(vec![("budget".into(), "1".into())], "1");
        assert!(!rule.matches(&example("Action", "Other"), &header()));
    }
}
