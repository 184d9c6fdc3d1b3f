//! Symbol sequence loading.
//!
//! A superpermutation arrives as a run of single digit characters. Loading trims
//! surrounding whitespace, rejects anything that is not a digit, and shifts the
//! values so the smallest observed digit becomes 0. The alphabet size N is the
//! span of observed values.

use crate::error::ConvertError;

/// An immutable, zero-based sequence of symbols over an alphabet of size N.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSequence {
    symbols: Vec<u8>,
    alphabet_size: usize,
}

impl SymbolSequence {
    /// Parse a superpermutation from text.
    ///
    /// # Example
    /// ```
    /// use superperm2midi::SymbolSequence;
    ///
    /// let seq = SymbolSequence::parse(" 123321\n").unwrap();
    /// assert_eq!(seq.symbols(), &[0, 1, 2, 2, 1, 0]);
    /// assert_eq!(seq.alphabet_size(), 3);
    /// ```
    pub fn parse(text: &str) -> Result<Self, ConvertError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ConvertError::EmptyInput);
        }

        let digits = trimmed
            .chars()
            .enumerate()
            .map(|(position, character)| {
                character
                    .to_digit(10)
                    .map(|d| d as u8)
                    .ok_or(ConvertError::InvalidSymbol {
                        position,
                        character,
                    })
            })
            .collect::<Result<Vec<u8>, _>>()?;

        // Non-empty, so min and max exist
        let min = digits.iter().copied().min().unwrap_or(0);
        let max = digits.iter().copied().max().unwrap_or(0);

        let symbols: Vec<u8> = digits.into_iter().map(|d| d - min).collect();
        let alphabet_size = (max - min) as usize + 1;

        log::debug!(
            "Loaded {} symbols over an alphabet of {} (offset {})",
            symbols.len(),
            alphabet_size,
            min
        );

        Ok(Self {
            symbols,
            alphabet_size,
        })
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// N, the number of distinct symbol values the sequence spans.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The N symbols immediately before `end`, i.e. `[end - N, end)`.
    ///
    /// Returns `None` when the window would start before the sequence or run
    /// past its end.
    pub fn window(&self, end: usize) -> Option<&[u8]> {
        let start = end.checked_sub(self.alphabet_size)?;
        self.symbols.get(start..end)
    }
}

/// A window is legal when none of its symbols repeat.
pub fn is_legal_window(window: &[u8]) -> bool {
    let mut seen = [false; 256];
    for &symbol in window {
        if seen[symbol as usize] {
            return false;
        }
        seen[symbol as usize] = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zero_bases_values() {
        let seq = SymbolSequence::parse("123321").unwrap();
        assert_eq!(seq.symbols(), &[0, 1, 2, 2, 1, 0]);
        assert_eq!(seq.alphabet_size(), 3);
        assert_eq!(seq.len(), 6);
    }

    #[test]
    fn test_parse_already_zero_based() {
        let seq = SymbolSequence::parse("0123012301230").unwrap();
        assert_eq!(seq.alphabet_size(), 4);
        assert_eq!(seq.symbols()[3], 3);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let seq = SymbolSequence::parse("\n  121 \t\n").unwrap();
        assert_eq!(seq.symbols(), &[0, 1, 0]);
        assert_eq!(seq.alphabet_size(), 2);
    }

    #[test]
    fn test_parse_single_symbol() {
        let seq = SymbolSequence::parse("7").unwrap();
        assert_eq!(seq.symbols(), &[0]);
        assert_eq!(seq.alphabet_size(), 1);
    }

    #[test]
    fn test_parse_rejects_non_digit() {
        let err = SymbolSequence::parse("12a3").unwrap_err();
        match err {
            ConvertError::InvalidSymbol {
                position,
                character,
            } => {
                assert_eq!(position, 2);
                assert_eq!(character, 'a');
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_inner_whitespace() {
        assert!(matches!(
            SymbolSequence::parse("12 3"),
            Err(ConvertError::InvalidSymbol { position: 2, .. })
        ));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(
            SymbolSequence::parse("   \n"),
            Err(ConvertError::EmptyInput)
        ));
    }

    #[test]
    fn test_window_bounds() {
        let seq = SymbolSequence::parse("0123").unwrap();
        assert_eq!(seq.window(3), None);
        assert_eq!(seq.window(4), Some(&[0, 1, 2, 3][..]));
        assert_eq!(seq.window(5), None);
    }

    #[test]
    fn test_legal_window() {
        assert!(is_legal_window(&[2, 0, 1]));
        assert!(!is_legal_window(&[2, 0, 2]));
        assert!(is_legal_window(&[]));
    }
}
