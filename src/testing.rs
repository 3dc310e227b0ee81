//! Shared lesson fixtures for tests.

/// Five-section lesson: two short sections, one blocklisted summary and two
/// long explanatory sections that should be the only quiz candidates.
pub const SCENARIO_LESSON: &str = "\
Lesson preamble that never becomes a section.

# Introduction

Welcome to the lesson.

## Section A: Basic Concepts

Variables store values that a program can read and change later. A variable is \
useful because it gives a name to a piece of data, so the rest of the code can \
refer to it without repeating the value. For example, a counter variable can \
start at zero and grow by one every time a loop runs. Choosing clear names \
matters because other readers rely on those names to understand what the \
program is doing at each step.

## Section B: Summary

This lesson covered variables, naming and growth rates. Names matter because \
they explain intent, and growth rates matter because they predict cost. Review \
each part again before moving on to the exercises at the end of the chapter, \
for example by rewriting the counter loop from memory.

## Section C: Advanced Theory

Coming soon.

## Section D: Detailed Analysis

Big-O notation describes how the running time of an algorithm grows with the \
size of its input. The definition is simple: a function f is O(g) when f stays \
below a constant multiple of g for large inputs. For example, a loop over n \
items performs n steps, therefore its cost is O(n). A nested loop performs \
n * n steps, which the formula T(n) = n^2 captures. Comparing growth rates lets \
us predict performance before running any code.
";

pub const SECTION_A_ID: &str = "section-a-basic-concepts";
pub const SECTION_D_ID: &str = "section-d-detailed-analysis";
