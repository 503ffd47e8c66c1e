//! Option parser for imagemerge.
//!
//! The flag surface is deliberately lenient, matching what board users
//! already type against the classic merge tools:
//!
//! - both `-` and `/` are accepted as the option delimiter
//! - matching is case-insensitive (`-PROG`, `-Prog`, `-prog` are the same)
//! - a table name only has to be a *prefix* of the token, so `-verbose`
//!   selects `v`; an ambiguous token silently resolves to the first table
//!   entry whose name it starts with
//! - a value may be attached to the option letters (`-offset1024`) or be
//!   the next argument (`-offset 1024`)
//!
//! The flag table is a single list of descriptors. Whether a flag takes a
//! value is carried by the descriptor tag itself, so the table cannot drift
//! out of sync with the dispatch code.

/// Flags that carry a value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueOpt {
    /// `-prog <file>`: program image input.
    Prog,
    /// `-fs <file>`: filesystem image input.
    Fs,
    /// `-image <file>`: merged output image.
    Image,
    /// `-offset <n>`: filesystem placement offset, in kilobyte units.
    Offset,
    /// `-fillchar <c>`: byte used to pad the gap region.
    FillChar,
}

/// Flags that stand alone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOpt {
    Verbose,
    Help,
}

#[derive(Copy, Clone)]
enum OptKind {
    Value(ValueOpt),
    Flag(FlagOpt),
}

/// One entry of the flag table.
struct OptSpec {
    name: &'static str,
    kind: OptKind,
}

/// Declaration order matters: prefix matching takes the first hit.
const OPT_TABLE: &[OptSpec] = &[
    OptSpec { name: "prog", kind: OptKind::Value(ValueOpt::Prog) },
    OptSpec { name: "fs", kind: OptKind::Value(ValueOpt::Fs) },
    OptSpec { name: "image", kind: OptKind::Value(ValueOpt::Image) },
    OptSpec { name: "offset", kind: OptKind::Value(ValueOpt::Offset) },
    OptSpec { name: "fillchar", kind: OptKind::Value(ValueOpt::FillChar) },
    OptSpec { name: "v", kind: OptKind::Flag(FlagOpt::Verbose) },
    OptSpec { name: "h", kind: OptKind::Flag(FlagOpt::Help) },
];

/// Outcome of parsing one token (plus, possibly, its value argument).
#[derive(Debug, PartialEq, Eq)]
pub enum Parsed<'a> {
    /// A recognized stand-alone flag (`-v`, `-h`).
    Flag(FlagOpt),
    /// A recognized flag together with its value.
    Value(ValueOpt, &'a str),
    /// A value-taking flag was the last token, with nothing following.
    /// Carries the table name of the flag for the diagnostic.
    MissingValue(&'static str),
    /// A bare token with no `-`/`/` delimiter.
    NoOption(&'a str),
    /// A delimited token matching no table entry.
    NotFound(&'a str),
}

/// Walks an argument list one option/value pair at a time.
pub struct OptParser<'a> {
    args: &'a [String],
    pos: usize,
}

impl<'a> OptParser<'a> {
    pub fn new(args: &'a [String]) -> Self {
        Self { args, pos: 0 }
    }
}

impl<'a> Iterator for OptParser<'a> {
    type Item = Parsed<'a>;

    fn next(&mut self) -> Option<Parsed<'a>> {
        let token = self.args.get(self.pos)?.as_str();
        self.pos += 1;

        // Exactly one leading delimiter is consumed.
        let rest = match token.strip_prefix('-').or_else(|| token.strip_prefix('/')) {
            Some(r) => r,
            None => return Some(Parsed::NoOption(token)),
        };

        let spec = match OPT_TABLE
            .iter()
            .find(|s| starts_with_ignore_case(rest, s.name))
        {
            Some(s) => s,
            None => return Some(Parsed::NotFound(token)),
        };

        let value_opt = match spec.kind {
            OptKind::Flag(flag) => return Some(Parsed::Flag(flag)),
            OptKind::Value(v) => v,
        };

        // Value attached to the option letters, or in the next argument.
        let attached = &rest[spec.name.len()..];
        let value = if !attached.is_empty() {
            attached
        } else {
            match self.args.get(self.pos) {
                Some(v) => {
                    self.pos += 1;
                    v.as_str()
                }
                None => return Some(Parsed::MissingValue(spec.name)),
            }
        };
        Some(Parsed::Value(value_opt, value))
    }
}

/// Case-insensitive "token begins with name". Table names are ASCII, so
/// slicing the token at `name.len()` afterwards stays on a char boundary.
fn starts_with_ignore_case(token: &str, name: &str) -> bool {
    token
        .as_bytes()
        .get(..name.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(name.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn value_in_next_argument() {
        let a = args(&["-prog", "firmware.bin"]);
        let mut p = OptParser::new(&a);
        assert_eq!(p.next(), Some(Parsed::Value(ValueOpt::Prog, "firmware.bin")));
        assert_eq!(p.next(), None);
    }

    #[test]
    fn value_attached_to_option_letters() {
        let a = args(&["-offset1024"]);
        let mut p = OptParser::new(&a);
        assert_eq!(p.next(), Some(Parsed::Value(ValueOpt::Offset, "1024")));
    }

    #[test]
    fn slash_delimiter_accepted() {
        let a = args(&["/fs", "littlefs.bin"]);
        let mut p = OptParser::new(&a);
        assert_eq!(p.next(), Some(Parsed::Value(ValueOpt::Fs, "littlefs.bin")));
    }

    #[test]
    fn matching_ignores_case() {
        let a = args(&["-IMAGE", "out.bin", "-H"]);
        let mut p = OptParser::new(&a);
        assert_eq!(p.next(), Some(Parsed::Value(ValueOpt::Image, "out.bin")));
        assert_eq!(p.next(), Some(Parsed::Flag(FlagOpt::Help)));
    }

    #[test]
    fn flags_take_no_value() {
        let a = args(&["-v", "-h"]);
        let mut p = OptParser::new(&a);
        assert_eq!(p.next(), Some(Parsed::Flag(FlagOpt::Verbose)));
        assert_eq!(p.next(), Some(Parsed::Flag(FlagOpt::Help)));
    }

    #[test]
    fn longer_spelling_matches_by_prefix() {
        // "verbose" starts with "v", "help" starts with "h"
        let a = args(&["-verbose", "/help"]);
        let mut p = OptParser::new(&a);
        assert_eq!(p.next(), Some(Parsed::Flag(FlagOpt::Verbose)));
        assert_eq!(p.next(), Some(Parsed::Flag(FlagOpt::Help)));
    }

    #[test]
    fn ambiguous_token_resolves_to_first_table_entry() {
        // "fsx" starts with "fs", so "x" rides along as its value
        let a = args(&["-fsx"]);
        let mut p = OptParser::new(&a);
        assert_eq!(p.next(), Some(Parsed::Value(ValueOpt::Fs, "x")));
    }

    #[test]
    fn missing_value_reported_with_flag_name() {
        let a = args(&["-offset"]);
        let mut p = OptParser::new(&a);
        assert_eq!(p.next(), Some(Parsed::MissingValue("offset")));
    }

    #[test]
    fn bare_token_is_no_option() {
        let a = args(&["firmware.bin"]);
        let mut p = OptParser::new(&a);
        assert_eq!(p.next(), Some(Parsed::NoOption("firmware.bin")));
    }

    #[test]
    fn unknown_flag_is_not_found() {
        let a = args(&["-bogus"]);
        let mut p = OptParser::new(&a);
        assert_eq!(p.next(), Some(Parsed::NotFound("-bogus")));
    }

    #[test]
    fn short_unmatched_token_is_not_found() {
        // no table name is a prefix of "f"
        let a = args(&["-f"]);
        let mut p = OptParser::new(&a);
        assert_eq!(p.next(), Some(Parsed::NotFound("-f")));
    }
}
