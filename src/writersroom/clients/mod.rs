// src/writersroom/clients/mod.rs

pub mod openai;
