//! End-to-end scenarios for the key rotator; see `tests/`.
