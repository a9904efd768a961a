//! A micro selector engine covering the subset the host selectors use:
//! `tag`, `#id`, `.class`, `[attr]` / `[attr="value"]` compounds joined by
//! the descendant combinator.

use anyhow::{Result, bail};

use crate::dom::Node;

/// One attribute condition inside a compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrCondition {
    pub name: String,
    /// `None` means presence-only (`[attr]`).
    pub value: Option<String>,
}

/// A whitespace-free simple selector, e.g. `ytd-comment-renderer`,
/// `#content-text` or `yt-formatted-string[id="content-text"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrCondition>,
}

impl Compound {
    pub fn matches(&self, node: &Node) -> bool {
        if let Some(tag) = &self.tag
            && !node.tag.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && node.id.as_deref() != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| node.classes.contains(c)) {
            return false;
        }
        self.attrs.iter().all(|cond| match &cond.value {
            Some(value) => node.attrs.get(&cond.name) == Some(value),
            None => node.attrs.contains_key(&cond.name),
        })
    }
}

/// A parsed selector: a descendant chain of compounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub compounds: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Selector> {
        let compounds = input
            .split_whitespace()
            .map(parse_compound)
            .collect::<Result<Vec<_>>>()?;
        if compounds.is_empty() {
            bail!("empty selector");
        }
        Ok(Selector { compounds })
    }

    /// The compound the matched node itself must satisfy; any preceding
    /// compounds apply to its ancestors.
    pub fn target(&self) -> &Compound {
        self.compounds.last().expect("parse rejects empty chains")
    }

    pub fn ancestors(&self) -> &[Compound] {
        &self.compounds[..self.compounds.len() - 1]
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(input: &str) -> Result<Compound> {
    let mut compound = Compound::default();
    let mut chars = input.char_indices().peekable();

    let take_ident = |chars: &mut std::iter::Peekable<std::str::CharIndices>| -> String {
        let mut ident = String::new();
        while let Some(&(_, c)) = chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            ident.push(c);
            chars.next();
        }
        ident
    };

    if matches!(chars.peek(), Some(&(_, c)) if is_ident_char(c)) {
        compound.tag = Some(take_ident(&mut chars));
    }

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            '#' => {
                chars.next();
                let id = take_ident(&mut chars);
                if id.is_empty() {
                    bail!("'{input}': expected identifier after '#'");
                }
                compound.id = Some(id);
            }
            '.' => {
                chars.next();
                let class = take_ident(&mut chars);
                if class.is_empty() {
                    bail!("'{input}': expected identifier after '.'");
                }
                compound.classes.push(class);
            }
            '[' => {
                chars.next();
                let name = take_ident(&mut chars);
                if name.is_empty() {
                    bail!("'{input}': expected attribute name after '['");
                }
                let value = match chars.peek() {
                    Some(&(_, '=')) => {
                        chars.next();
                        if !matches!(chars.next(), Some((_, '"'))) {
                            bail!("'{input}': expected '\"' after '=' in attribute selector");
                        }
                        let mut value = String::new();
                        loop {
                            match chars.next() {
                                Some((_, '"')) => break,
                                Some((_, c)) => value.push(c),
                                None => bail!("'{input}': unterminated attribute value"),
                            }
                        }
                        Some(value)
                    }
                    _ => None,
                };
                if !matches!(chars.next(), Some((_, ']'))) {
                    bail!("'{input}': expected ']' in attribute selector");
                }
                compound.attrs.push(AttrCondition { name, value });
            }
            _ => bail!("'{input}': unexpected character '{c}' at offset {pos}"),
        }
    }

    if compound == Compound::default() {
        bail!("'{input}': empty compound");
    }
    Ok(compound)
}
