//! Lenient parsing of raw traceroute output
//!
//! Understands the common line shapes of Unix `traceroute` and Windows
//! `tracert`: a hop line starts with the 1-based hop number, carries one or
//! more probe replies (`hostname (ip)`, a bare address, or `*` for a
//! timeout), and may be followed by indented continuation lines when a hop
//! answered from several addresses. Header and trailer lines are skipped.

/// A fully parsed trace: hops in path order, 0-indexed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTrace {
    pub hops: Vec<Hop>,
}

/// One hop along the path, holding every probe reply it produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hop {
    pub probes: Vec<Probe>,
}

/// A single probe reply; `addr` is `None` for a timeout (`*`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub addr: Option<String>,
}

impl Hop {
    /// Address of the first probe, the hop's identity for comparison.
    ///
    /// `None` both for a hop whose first probe timed out and for a hop
    /// that yielded no probes at all — one unresolved sentinel.
    pub fn first_addr(&self) -> Option<&str> {
        self.probes.first().and_then(|p| p.addr.as_deref())
    }
}

/// Parse raw traceroute output into an ordered hop sequence.
///
/// Never fails: unrecognized lines are treated as headers and skipped, so
/// an empty or garbage input simply yields a trace with zero hops.
pub fn parse(raw: &str) -> ParsedTrace {
    let mut hops: Vec<Hop> = Vec::new();

    for line in raw.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            continue;
        };

        if first.parse::<usize>().is_ok() {
            // New hop line; the printed number is 1-based, position is
            // taken from push order
            let mut hop = Hop::default();
            probes_from_tokens(&tokens[1..], &mut hop.probes);
            hops.push(hop);
        } else if line.starts_with(char::is_whitespace) {
            // Indented continuation: further replies for the open hop
            if let Some(hop) = hops.last_mut() {
                probes_from_tokens(&tokens, &mut hop.probes);
            }
        }
        // Anything else is a header or trailer line
    }

    ParsedTrace { hops }
}

/// Extract probe replies from the tokens of one (partial) hop line
fn probes_from_tokens(tokens: &[&str], probes: &mut Vec<Probe>) {
    let mut i = 0;
    while i < tokens.len() {
        let tok = tokens[i];

        if tok == "*" {
            probes.push(Probe { addr: None });
            i += 1;
            continue;
        }

        // Round-trip times ("1.234", "ms", tracert's "<1") and annotations
        // ("!H", "!X") carry no address
        if tok == "ms"
            || tok.parse::<f64>().is_ok()
            || tok.starts_with('<')
            || tok.starts_with('!')
        {
            i += 1;
            continue;
        }

        // A wrapped address that was not consumed by a preceding hostname
        // belongs to no probe; skip it
        if unwrap_addr(tok).is_some() {
            i += 1;
            continue;
        }

        // Hostname or bare address; a following "(ip)" / "[ip]" names the
        // actual resolved address
        let mut addr = tok.to_string();
        if let Some(next) = tokens.get(i + 1).and_then(|t| unwrap_addr(t)) {
            addr = next.to_string();
            i += 1;
        }
        probes.push(Probe { addr: Some(addr) });
        i += 1;
    }
}

/// Strip the `(…)` of traceroute or the `[…]` of tracert around an address
fn unwrap_addr(token: &str) -> Option<&str> {
    token
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .or_else(|| token.strip_prefix('[').and_then(|t| t.strip_suffix(']')))
}
