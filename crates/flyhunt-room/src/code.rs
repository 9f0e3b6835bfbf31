//! Room code generation.

use flyhunt_protocol::RoomCode;
use rand::Rng;

use crate::RoomStore;

/// Characters a room code may contain. `0`, `O`, `1`, and `I` are
/// excluded — codes get read aloud and typed from the other couch.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Room codes are always this long.
pub const CODE_LENGTH: usize = 4;

/// Draws a random code. Not collision-checked.
fn random_code() -> RoomCode {
    let mut rng = rand::rng();
    let code: String = (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    RoomCode::normalize(&code)
}

/// Generates a code that is not currently present in `store`.
///
/// Redraws on collision. With 32^4 possible codes the loop all but
/// never iterates twice at realistic room counts, but the contract is
/// exact either way: the returned code is free at the time of the call.
pub fn generate_unique(store: &RoomStore) -> RoomCode {
    loop {
        let code = random_code();
        if !store.contains(&code) {
            return code;
        }
    }
}
