//! WebSocket protocol tests
