#![deny(missing_docs)]

//! # Runtime Support Unit
//!
//! The hand-maintained TypeScript module shipped verbatim alongside the
//! generated units: the `v` combinator namespace the emitted validators are
//! written against, the dispatch-entry constructors, the transport contract,
//! and the two runtime error classes.
//!
//! The transport *implementation* stays external; only its contract lives
//! here.

use crate::emit::EmittedUnit;

/// Source of the runtime unit, emitted as `runtime.ts`.
pub const RUNTIME_SOURCE: &str = r#"/* Runtime support for the generated client. Copied verbatim into every
 * output tree; edit the generator, not this file. */

/** A decoded response body failed its validator. Never silently recovered. */
export class ResponseValidationError extends Error {
  constructor(readonly status: number, readonly body: unknown) {
    super(`response body for status ${status} failed validation`);
  }
}

/** An observed status has no dispatch entry. Carries the raw payload. */
export class UnexpectedStatusError extends Error {
  constructor(readonly status: number, readonly body: unknown) {
    super(`unexpected response status ${status}`);
  }
}

type Predicate = (value: unknown) => boolean;

/** A chainable runtime check. Constraint methods return a new validator. */
export class Validator {
  constructor(private readonly checks: readonly Predicate[]) {}

  private with(check: Predicate): Validator {
    return new Validator([...this.checks, check]);
  }

  test(value: unknown): boolean {
    return this.checks.every((check) => check(value));
  }

  eq(expected: unknown): Validator {
    return this.with((value) => value === expected);
  }

  oneOf(values: readonly unknown[]): Validator {
    return this.with((value) => values.includes(value));
  }

  /** Format names are carried as documentation, not enforced. */
  format(_name: string): Validator {
    return this;
  }

  min(bound: number): Validator {
    return this.with((value) => magnitude(value) >= bound);
  }

  max(bound: number): Validator {
    return this.with((value) => magnitude(value) <= bound);
  }

  pattern(source: string): Validator {
    const re = new RegExp(source);
    return this.with((value) => typeof value === 'string' && re.test(value));
  }

  minItems(bound: number): Validator {
    return this.with((value) => Array.isArray(value) && value.length >= bound);
  }

  maxItems(bound: number): Validator {
    return this.with((value) => Array.isArray(value) && value.length <= bound);
  }

  orNull(): Validator {
    const inner = this;
    return new Validator([(value) => value === null || inner.test(value)]);
  }
}

/** Marks an object field as admissible-when-absent. */
export class OptionalValidator extends Validator {
  readonly optional = true;

  constructor(inner: Validator) {
    super([(value) => inner.test(value)]);
  }
}

function magnitude(value: unknown): number {
  if (typeof value === 'string') return value.length;
  if (typeof value === 'number') return value;
  return Number.NaN;
}

function isPlainObject(value: unknown): value is Record<string, unknown> {
  return typeof value === 'object' && value !== null && !Array.isArray(value);
}

function objectValidator(fields: Record<string, Validator>, sealed: boolean): Validator {
  return new Validator([
    (value) => {
      if (!isPlainObject(value)) return false;
      for (const [name, field] of Object.entries(fields)) {
        if (!(name in value)) {
          if (!(field instanceof OptionalValidator)) return false;
          continue;
        }
        if (!field.test(value[name])) return false;
      }
      if (sealed) {
        for (const name of Object.keys(value)) {
          if (!(name in fields)) return false;
        }
      }
      return true;
    },
  ]);
}

/** The combinator namespace every generated validator is written against. */
export const v = {
  str: () => new Validator([(value) => typeof value === 'string']),
  int: () => new Validator([(value) => Number.isInteger(value)]),
  num: () => new Validator([(value) => typeof value === 'number' && Number.isFinite(value)]),
  bool: () => new Validator([(value) => typeof value === 'boolean']),
  opt: (inner: Validator) => new OptionalValidator(inner),
  obj: (fields: Record<string, Validator>) => objectValidator(fields, false),
  sealed: (fields: Record<string, Validator>) => objectValidator(fields, true),
  record: (values: Validator) =>
    new Validator([
      (value) => isPlainObject(value) && Object.values(value).every((item) => values.test(item)),
    ]),
  arr: (items: Validator) =>
    new Validator([(value) => Array.isArray(value) && value.every((item) => items.test(item))]),
  union: (members: readonly Validator[]) =>
    new Validator([(value) => members.some((member) => member.test(value))]),
  all: (first: Validator, second: Validator) =>
    new Validator([(value) => first.test(value) && second.test(value)]),
  nullable: (inner: Validator) =>
    new Validator([(value) => value === null || inner.test(value)]),
  /** Selects the member named by the discriminator field; never trial-matches. */
  tagged: (property: string, mapping: Record<string, Validator>) =>
    new Validator([
      (value) => {
        if (!isPlainObject(value)) return false;
        const tag = value[property];
        if (typeof tag !== 'string') return false;
        const member = mapping[tag];
        return member !== undefined && member.test(value);
      },
    ]),
};

/** One dispatch-table entry: how to decode the body of one status. */
export type DispatchEntry =
  | { kind: 'json'; check: Validator }
  | { kind: 'ndjson'; check: Validator }
  | { kind: 'pgn' }
  | { kind: 'mixed' }
  | { kind: 'none' };

export const json = (check: Validator): DispatchEntry => ({ kind: 'json', check });
export const ndjson = (check: Validator): DispatchEntry => ({ kind: 'ndjson', check });
export const pgn = (): DispatchEntry => ({ kind: 'pgn' });
export const mixed = (): DispatchEntry => ({ kind: 'mixed' });
export const none = (): DispatchEntry => ({ kind: 'none' });

/** Status → decoding rule, consulted once a live response is received. */
export type DispatchTable = Record<number, DispatchEntry>;

export interface RequestDescriptor {
  method: string;
  path: string;
  query?: Record<string, unknown>;
  body?: unknown;
  bodyFormat?: 'json' | 'text' | 'form';
  baseUrl?: string;
  anonymous?: boolean;
}

/** External collaborator: performs the call and applies the dispatch table.
 * Implementations attach the bearer token unless the request is anonymous. */
export interface Transport {
  request(request: RequestDescriptor, dispatch: DispatchTable): Promise<unknown>;
}

/** Interprets a decoded body against the table; transports call this once
 * per response. ndjson bodies arrive as one decoded value per line. */
export function interpret(table: DispatchTable, status: number, body: unknown): unknown {
  const entry = table[status];
  if (entry === undefined) throw new UnexpectedStatusError(status, body);
  switch (entry.kind) {
    case 'json':
      if (!entry.check.test(body)) throw new ResponseValidationError(status, body);
      return body;
    case 'ndjson':
      if (!Array.isArray(body) || !body.every((line) => entry.check.test(line))) {
        throw new ResponseValidationError(status, body);
      }
      return body;
    case 'pgn':
    case 'mixed':
      return body;
    case 'none':
      return undefined;
  }
}
"#;

/// The runtime unit descriptor. No dependencies by construction.
pub fn runtime_unit() -> EmittedUnit {
    EmittedUnit {
        name: String::from("runtime"),
        dependencies: Vec::new(),
        source: String::from(RUNTIME_SOURCE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_unit_is_self_contained() {
        let unit = runtime_unit();
        assert_eq!(unit.name, "runtime");
        assert!(unit.dependencies.is_empty());
        assert!(!unit.source.contains("import "));
    }

    #[test]
    fn test_runtime_defines_contract_surface() {
        for needle in [
            "export class ResponseValidationError",
            "export class UnexpectedStatusError",
            "export const v",
            "export interface Transport",
            "export function interpret",
        ] {
            assert!(RUNTIME_SOURCE.contains(needle), "missing {}", needle);
        }
    }
}
