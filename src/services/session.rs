use rand::Rng;

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Builds a display-only session token: `prefix` followed by `length`
/// uppercase base-36 characters.
pub fn generate_session_token(prefix: &str, length: usize) -> String {
    let mut rng = rand::rng();
    let mut token = String::with_capacity(prefix.len() + length);
    token.push_str(prefix);
    token.extend((0..length).map(|_| BASE36[rng.random_range(0..BASE36.len())] as char));
    token
}
