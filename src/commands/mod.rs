/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `watch`: Run the slot watch loop, a single cycle, or a dry run
- `check`: Verify configuration against the live endpoints

The handlers stay small and wire together the booking client, the watch
runner, and the notifier from the library crate.
*/

pub mod check;
pub mod watch;
