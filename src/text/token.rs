use serde::{Deserialize, Serialize};

/// One piece of tokenized text: either a word or a whitespace run.
///
/// Whitespace runs get their own tokens so that concatenating every token's
/// text reconstructs the input exactly. The `index` space covers word and
/// whitespace tokens alike; highlighting and boundary-event mapping both
/// operate over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub is_word: bool,
    pub index: usize,
}

/// Split text into word and whitespace tokens with stable indices.
///
/// Pure and lossless: no shared state, and the concatenation of all token
/// texts equals the input. An empty input yields an empty sequence.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_is_ws: Option<bool> = None;

    let flush = |current: &mut String, is_ws: bool, tokens: &mut Vec<Token>| {
        if current.is_empty() {
            return;
        }
        tokens.push(Token {
            text: std::mem::take(current),
            is_word: !is_ws,
            index: tokens.len(),
        });
    };

    for c in text.chars() {
        let is_ws = c.is_whitespace();
        if current_is_ws != Some(is_ws) {
            if let Some(prev) = current_is_ws {
                flush(&mut current, prev, &mut tokens);
            }
            current_is_ws = Some(is_ws);
        }
        current.push(c);
    }
    if let Some(prev) = current_is_ws {
        flush(&mut current, prev, &mut tokens);
    }

    tokens
}

/// Find the token containing the given character offset.
///
/// Walks cumulative token lengths; offsets past the end clamp to the last
/// token. Returns `None` only for an empty token list.
pub fn find_token_index_at_char_index(tokens: &[Token], char_index: usize) -> Option<usize> {
    let mut acc = 0usize;
    for token in tokens {
        let len = token.text.chars().count();
        if char_index < acc + len {
            return Some(token.index);
        }
        acc += len;
    }
    tokens.last().map(|t| t.index)
}

#[cfg(test)]
mod tests {
    use super::{find_token_index_at_char_index, tokenize};

    #[test]
    fn splits_words_and_whitespace() {
        let tokens = tokenize("Hi  there");
        assert_eq!(tokens.len(), 3);
        assert_eq!((tokens[0].text.as_str(), tokens[0].is_word), ("Hi", true));
        assert_eq!((tokens[1].text.as_str(), tokens[1].is_word), ("  ", false));
        assert_eq!(
            (tokens[2].text.as_str(), tokens[2].is_word),
            ("there", true)
        );
        assert_eq!(tokens[2].index, 2);
    }

    #[test]
    fn lossless_reassembly() {
        let inputs = ["", "word", "  leading", "trailing  ", "a b\tc\nd", "héllo wörld"];
        for input in inputs {
            let rebuilt: String = tokenize(input).iter().map(|t| t.text.as_str()).collect();
            assert_eq!(rebuilt, input);
        }
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn maps_char_index_to_token() {
        let tokens = tokenize("Hello world. This is a test!");
        // "This" starts at character 13.
        assert_eq!(find_token_index_at_char_index(&tokens, 13), Some(4));
        assert_eq!(find_token_index_at_char_index(&tokens, 0), Some(0));
        // Inside the first whitespace run.
        assert_eq!(find_token_index_at_char_index(&tokens, 5), Some(1));
    }

    #[test]
    fn clamps_past_the_end() {
        let tokens = tokenize("ab cd");
        assert_eq!(find_token_index_at_char_index(&tokens, 999), Some(2));
        assert_eq!(find_token_index_at_char_index(&[], 0), None);
    }
}
